//! Correlation matrix normalization.
//!
//! The profiler writes correlations as an array of row objects where the row
//! identity is its position. This is converted once into an explicit
//! `features` + dense `matrix` pair and nothing downstream sees the raw form.

use crate::defect::Defect;
use crate::report::CorrelationMatrix;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tolerance used for the symmetry and unit-diagonal checks.
const CORRELATION_EPSILON: f64 = 1e-9;

/// Dense correlation matrix addressed by feature position.
///
/// Always square: `matrix.len() == features.len()` and every row has
/// `features.len()` cells. Cells the artifact did not provide are `NaN`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCorrelation {
    pub features: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defects: Vec<Defect>,
}

/// An off-diagonal pair and its coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub a: String,
    pub b: String,
    pub value: f64,
}

impl NormalizedCorrelation {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn index_of(&self, feature: &str) -> Option<usize> {
        self.features.iter().position(|f| f == feature)
    }

    /// Coefficient between two features; `None` if either name is unknown.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let (i, j) = (self.index_of(a)?, self.index_of(b)?);
        self.matrix.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Back to the row-object encoding. `NaN` cells become `null`.
    pub fn to_rows(&self) -> CorrelationMatrix {
        CorrelationMatrix(
            self.matrix
                .iter()
                .map(|row| {
                    self.features
                        .iter()
                        .zip(row)
                        .map(|(feature, value)| {
                            (feature.clone(), (!value.is_nan()).then_some(*value))
                        })
                        .collect()
                })
                .collect(),
        )
    }

    /// The `limit` strongest distinct pairs by absolute value, upper triangle only.
    pub fn strongest_pairs(&self, limit: usize) -> Vec<CorrelationPair> {
        let mut pairs: Vec<CorrelationPair> = Vec::new();
        for (i, row) in self.matrix.iter().enumerate() {
            for (j, value) in row.iter().enumerate().skip(i + 1) {
                if value.is_finite() {
                    pairs.push(CorrelationPair {
                        a: self.features[i].clone(),
                        b: self.features[j].clone(),
                        value: *value,
                    });
                }
            }
        }
        pairs.sort_by(|x, y| {
            y.value
                .abs()
                .total_cmp(&x.value.abs())
                .then_with(|| x.a.cmp(&y.a))
                .then_with(|| x.b.cmp(&y.b))
        });
        pairs.truncate(limit);
        pairs
    }
}

/// Convert the row-object encoding into a dense matrix.
///
/// Feature order comes from the first row. A later row missing a key gets
/// `NaN` in that cell; keys the first row does not have are ignored. Both are
/// recorded as defects together with row-count, symmetry and diagonal
/// violations. This never panics and never substitutes `0`.
pub fn normalize_correlation_matrix(raw: &CorrelationMatrix) -> NormalizedCorrelation {
    let rows = &raw.0;
    let Some(first) = rows.first() else {
        return NormalizedCorrelation::default();
    };

    let features: Vec<String> = first.keys().cloned().collect();
    let n = features.len();
    let mut defects = Vec::new();

    if rows.len() != n {
        defects.push(Defect::CorrelationRowCount {
            features: n,
            rows: rows.len(),
        });
    }

    let matrix: Vec<Vec<f64>> = (0..n)
        .map(|i| match rows.get(i) {
            Some(row) => dense_row(i, row, &features, &mut defects),
            None => vec![f64::NAN; n],
        })
        .collect();

    check_shape_invariants(&features, &matrix, &mut defects);

    if !defects.is_empty() {
        warn!(
            features = n,
            defects = defects.len(),
            "correlation matrix is malformed, rendering with placeholders"
        );
    }

    NormalizedCorrelation {
        features,
        matrix,
        defects,
    }
}

fn dense_row(
    index: usize,
    row: &IndexMap<String, Option<f64>>,
    features: &[String],
    defects: &mut Vec<Defect>,
) -> Vec<f64> {
    let mut missing = Vec::new();
    let dense = features
        .iter()
        .map(|feature| match row.get(feature) {
            Some(value) => value.unwrap_or(f64::NAN),
            None => {
                missing.push(feature.clone());
                f64::NAN
            }
        })
        .collect();

    let extra: Vec<String> = row
        .keys()
        .filter(|key| !features.contains(*key))
        .cloned()
        .collect();

    if !missing.is_empty() || !extra.is_empty() {
        defects.push(Defect::RaggedCorrelationRow {
            row: index,
            missing,
            extra,
        });
    }
    dense
}

fn check_shape_invariants(features: &[String], matrix: &[Vec<f64>], defects: &mut Vec<Defect>) {
    for (i, feature) in features.iter().enumerate() {
        let diagonal = matrix[i][i];
        if diagonal.is_finite() && (diagonal - 1.0).abs() > CORRELATION_EPSILON {
            defects.push(Defect::CorrelationDiagonal {
                feature: feature.clone(),
                value: diagonal,
            });
        }
        for j in (i + 1)..features.len() {
            let (upper, lower) = (matrix[i][j], matrix[j][i]);
            let comparable = upper.is_finite() && lower.is_finite();
            if comparable && (upper - lower).abs() > CORRELATION_EPSILON {
                defects.push(Defect::AsymmetricCorrelation {
                    a: feature.clone(),
                    b: features[j].clone(),
                });
            }
        }
    }
}
