//! Bar chart data for importance, types, missing values and categories.

use crate::classify::RankedImportance;
use crate::derive::{CategoryCount, MissingBar, NamedValue};
use serde::{Deserialize, Serialize};

/// Colours for categorical series, assigned by position.
pub const CATEGORY_PALETTE: [&str; 8] = [
    "#3b82f6", "#22c55e", "#f97316", "#a855f7", "#ef4444", "#14b8a6", "#eab308", "#6b7280",
];

const MISSING_COLOR: &str = "#f59e0b";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    pub color: String,
    /// Preformatted value for tooltips.
    pub display: String,
}

fn palette(index: usize) -> &'static str {
    CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()]
}

/// Ranked feature-importance bars, most important first.
pub fn importance_bars(ranked: &[RankedImportance]) -> Vec<BarDatum> {
    ranked
        .iter()
        .map(|item| BarDatum {
            label: item.feature.clone(),
            value: item.importance,
            color: item.color.clone(),
            display: format!("{:.1}%", item.importance * 100.0),
        })
        .collect()
}

/// One bar per variable type, colours stable by position.
pub fn type_bars(distribution: &[NamedValue]) -> Vec<BarDatum> {
    distribution
        .iter()
        .enumerate()
        .map(|(index, entry)| BarDatum {
            label: entry.name.clone(),
            value: entry.value as f64,
            color: palette(index).to_string(),
            display: entry.value.to_string(),
        })
        .collect()
}

pub fn missing_bars(bars: &[MissingBar]) -> Vec<BarDatum> {
    bars.iter()
        .map(|bar| BarDatum {
            label: bar.name.clone(),
            value: bar.percentage,
            color: MISSING_COLOR.to_string(),
            display: format!("{} ({:.2}%)", bar.count, bar.percentage),
        })
        .collect()
}

pub fn category_bars(categories: &[CategoryCount]) -> Vec<BarDatum> {
    categories
        .iter()
        .enumerate()
        .map(|(index, category)| BarDatum {
            label: category.label.clone(),
            value: category.count as f64,
            color: palette(index).to_string(),
            display: format!("{} ({:.1}%)", category.count, category.share * 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{FeatureImportance, rank_feature_importance};

    #[test]
    fn test_importance_bars_sorted() {
        let ranked = rank_feature_importance(&[
            FeatureImportance {
                feature: "NOX".to_string(),
                importance: 0.1,
            },
            FeatureImportance {
                feature: "LSTAT".to_string(),
                importance: 0.42,
            },
        ]);
        let bars = importance_bars(&ranked);
        assert_eq!(bars[0].label, "LSTAT");
        assert_eq!(bars[0].display, "42.0%");
        assert_eq!(bars[1].color, "#bfdbfe");
    }

    #[test]
    fn test_palette_wraps() {
        let distribution: Vec<NamedValue> = (0..10)
            .map(|i| NamedValue {
                name: format!("T{i}"),
                value: i,
            })
            .collect();
        let bars = type_bars(&distribution);
        assert_eq!(bars[8].color, bars[0].color);
        assert_eq!(bars[3].display, "3");
    }

    #[test]
    fn test_missing_bars_display() {
        let bars = missing_bars(&[MissingBar {
            name: "AGE".to_string(),
            count: 20,
            percentage: 3.952569,
        }]);
        assert_eq!(bars[0].display, "20 (3.95%)");
    }
}
