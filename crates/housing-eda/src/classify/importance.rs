//! Feature-importance emphasis and ranking.

use serde::{Deserialize, Serialize};

/// Normalized importance above this gets strong emphasis.
pub const STRONG_IMPORTANCE: f64 = 0.7;
/// Normalized importance above this gets medium emphasis.
pub const MEDIUM_IMPORTANCE: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Strong,
    Medium,
    Low,
}

impl Emphasis {
    pub fn classify(normalized: f64) -> Self {
        if normalized > STRONG_IMPORTANCE {
            Self::Strong
        } else if normalized > MEDIUM_IMPORTANCE {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Strong => "#2563eb",
            Self::Medium => "#60a5fa",
            Self::Low => "#bfdbfe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedImportance {
    /// 1-based position after sorting by importance.
    pub rank: usize,
    pub feature: String,
    pub importance: f64,
    /// Importance divided by the largest importance in the same list.
    pub normalized: f64,
    pub emphasis: Emphasis,
    pub color: String,
}

/// Rank a list of importances, most important first.
///
/// The maximum is taken from `items` on every call since each training run
/// ships its own list. Non-finite importances and lists whose maximum is not
/// positive normalize to `0`.
pub fn rank_feature_importance(items: &[FeatureImportance]) -> Vec<RankedImportance> {
    let max = items
        .iter()
        .map(|item| item.importance)
        .filter(|value| value.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    let normalize = |importance: f64| {
        if importance.is_finite() && max > 0.0 {
            importance / max
        } else {
            0.0
        }
    };

    let mut sorted: Vec<&FeatureImportance> = items.iter().collect();
    sorted.sort_by(|a, b| normalize(b.importance).total_cmp(&normalize(a.importance)));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let normalized = normalize(item.importance);
            let emphasis = Emphasis::classify(normalized);
            RankedImportance {
                rank: index + 1,
                feature: item.feature.clone(),
                importance: item.importance,
                normalized,
                emphasis,
                color: emphasis.color().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn importances(values: &[(&str, f64)]) -> Vec<FeatureImportance> {
        values
            .iter()
            .map(|(feature, importance)| FeatureImportance {
                feature: feature.to_string(),
                importance: *importance,
            })
            .collect()
    }

    #[test]
    fn test_rank_and_emphasis() {
        let ranked = rank_feature_importance(&importances(&[
            ("CRIM", 0.04),
            ("RM", 0.45),
            ("LSTAT", 0.5),
            ("DIS", 0.25),
        ]));

        let order: Vec<(&str, Emphasis)> = ranked
            .iter()
            .map(|r| (r.feature.as_str(), r.emphasis))
            .collect();
        assert_eq!(
            order,
            vec![
                ("LSTAT", Emphasis::Strong),
                ("RM", Emphasis::Strong),
                ("DIS", Emphasis::Medium),
                ("CRIM", Emphasis::Low),
            ]
        );
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].normalized, 1.0);
    }

    #[test]
    fn test_max_recomputed_per_list() {
        let first = rank_feature_importance(&importances(&[("RM", 0.9), ("TAX", 0.3)]));
        let second = rank_feature_importance(&importances(&[("TAX", 0.3)]));
        assert_eq!(first[1].emphasis, Emphasis::Low);
        assert_eq!(second[0].emphasis, Emphasis::Strong);
    }

    #[test]
    fn test_degenerate_lists() {
        assert!(rank_feature_importance(&[]).is_empty());

        let zeros = rank_feature_importance(&importances(&[("A", 0.0), ("B", 0.0)]));
        assert!(zeros.iter().all(|r| r.normalized == 0.0 && r.emphasis == Emphasis::Low));

        let with_nan = rank_feature_importance(&importances(&[("A", f64::NAN), ("B", 0.2)]));
        assert_eq!(with_nan[0].feature, "B");
        assert_eq!(with_nan[1].normalized, 0.0);
    }
}
