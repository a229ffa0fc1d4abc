//! Malformed-shape findings.
//!
//! A missing optional field is resolved by a fallback and leaves no trace. A
//! malformed shape (ragged correlation rows, histogram arrays of inconsistent
//! length, broken invariants) still renders in degraded form and is recorded
//! as a [`Defect`] so the page can show a notice and tests can tell the two
//! cases apart.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Defect {
    /// A correlation row lacks keys of the first row (cells become NaN) or has
    /// extra ones (ignored).
    RaggedCorrelationRow {
        row: usize,
        missing: Vec<String>,
        extra: Vec<String>,
    },
    /// Row count differs from the feature count of the first row.
    CorrelationRowCount { features: usize, rows: usize },
    /// `M[i][j] != M[j][i]`.
    AsymmetricCorrelation { a: String, b: String },
    /// Diagonal cell is not 1.0.
    CorrelationDiagonal { feature: String, value: f64 },
    /// `bin_edges.len() != counts.len() + 1`; the binding was truncated.
    HistogramLengthMismatch { counts: usize, bin_edges: usize },
    /// `min <= p25 <= p50 <= p75 <= max` does not hold.
    QuantileOrder { variable: String },
    /// More missing cells reported than cells in the table.
    MissingCellsExceedTotal { missing: u64, total: u64 },
}

impl Defect {
    /// Short machine-readable tag, matching the serialized `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RaggedCorrelationRow { .. } => "ragged_correlation_row",
            Self::CorrelationRowCount { .. } => "correlation_row_count",
            Self::AsymmetricCorrelation { .. } => "asymmetric_correlation",
            Self::CorrelationDiagonal { .. } => "correlation_diagonal",
            Self::HistogramLengthMismatch { .. } => "histogram_length_mismatch",
            Self::QuantileOrder { .. } => "quantile_order",
            Self::MissingCellsExceedTotal { .. } => "missing_cells_exceed_total",
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedCorrelationRow {
                row,
                missing,
                extra,
            } => write!(
                f,
                "correlation row {row}: missing [{}], unexpected [{}]",
                missing.join(", "),
                extra.join(", ")
            ),
            Self::CorrelationRowCount { features, rows } => {
                write!(f, "correlation matrix has {rows} rows for {features} features")
            }
            Self::AsymmetricCorrelation { a, b } => {
                write!(f, "correlation between {a} and {b} is not symmetric")
            }
            Self::CorrelationDiagonal { feature, value } => {
                write!(f, "self-correlation of {feature} is {value}, expected 1")
            }
            Self::HistogramLengthMismatch { counts, bin_edges } => write!(
                f,
                "histogram has {counts} counts but {bin_edges} bin edges"
            ),
            Self::QuantileOrder { variable } => {
                write!(f, "quantiles of {variable} are not ordered")
            }
            Self::MissingCellsExceedTotal { missing, total } => {
                write!(f, "{missing} missing cells reported for {total} cells")
            }
        }
    }
}
