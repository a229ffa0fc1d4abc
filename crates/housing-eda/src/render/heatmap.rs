//! Correlation heatmap cells.

use crate::classify::{CorrelationStrength, correlation_color};
use crate::defect::Defect;
use crate::derive::{CorrelationPair, NormalizedCorrelation};
use serde::{Deserialize, Serialize};

/// Shown in cells without a value.
pub const PLACEHOLDER: &str = "–";

const DARK_TEXT: &str = "#111827";
const LIGHT_TEXT: &str = "#ffffff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub row: String,
    pub col: String,
    /// `None` when the artifact did not provide the cell.
    pub value: Option<f64>,
    /// Two decimals, or [`PLACEHOLDER`].
    pub label: String,
    pub background_color: String,
    pub text_color: String,
    pub strength: CorrelationStrength,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub method: String,
    pub features: Vec<String>,
    /// Row-major, `features.len()` squared.
    pub cells: Vec<Vec<HeatmapCell>>,
    pub top_pairs: Vec<CorrelationPair>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defects: Vec<Defect>,
}

/// Build heatmap cells for one correlation method.
///
/// Diagonal cells always take the full-opacity colour of their sign, even
/// when the artifact reports a diagonal other than exactly 1.
pub fn bind_heatmap(
    method: &str,
    correlation: &NormalizedCorrelation,
    top_pairs: usize,
) -> Heatmap {
    let features = &correlation.features;
    let cells = correlation
        .matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, value)| heatmap_cell(&features[i], &features[j], *value, i == j))
                .collect()
        })
        .collect();

    Heatmap {
        method: method.to_string(),
        features: correlation.features.clone(),
        cells,
        top_pairs: correlation.strongest_pairs(top_pairs),
        defects: correlation.defects.clone(),
    }
}

fn heatmap_cell(row: &str, col: &str, value: f64, diagonal: bool) -> HeatmapCell {
    let strength = CorrelationStrength::classify(value);
    let fill = if diagonal && value.is_finite() {
        correlation_color(if value < 0.0 { -1.0 } else { 1.0 })
    } else {
        correlation_color(value)
    };
    let value = value.is_finite().then_some(value);

    HeatmapCell {
        row: row.to_string(),
        col: col.to_string(),
        value,
        label: value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.2}")),
        background_color: fill.css(),
        text_color: if value.is_some() && fill.alpha > 0.5 {
            LIGHT_TEXT
        } else {
            DARK_TEXT
        }
        .to_string(),
        strength,
        bold: strength.is_bold(),
    }
}
