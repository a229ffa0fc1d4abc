//! Response shapes of the analytics EDA endpoints.
//!
//! The same shapes are produced locally from a CSV by [`crate::source`], so a
//! page can be fed from either side.

use crate::classify::FeatureImportance;
use crate::report::{Histogram, NumericStats};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// `GET /api/v1/eda/dataset-info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub rows: u64,
    pub columns: u64,
    #[serde(default)]
    pub features: Vec<String>,
    /// Column -> number of missing values.
    #[serde(default)]
    pub missing_values: IndexMap<String, u64>,
    /// Column -> dtype name.
    #[serde(default)]
    pub dtypes: IndexMap<String, String>,
    /// Preformatted, e.g. `"41.09 KB"`.
    #[serde(default)]
    pub memory_usage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// `GET /api/v1/eda/statistics?feature=...`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureStatistics {
    pub feature: String,
    #[serde(default)]
    pub count: u64,
    #[serde(flatten)]
    pub stats: NumericStats,
}

/// `GET /api/v1/eda/distribution?feature=...&bins=...`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub feature: String,
    /// Bin edges, one more than `counts`.
    pub bins: Vec<f64>,
    pub counts: Vec<u64>,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
}

impl Distribution {
    /// The distribution in the profiler's histogram shape.
    pub fn histogram(&self) -> Histogram {
        Histogram {
            counts: self.counts.clone(),
            bin_edges: self.bins.clone(),
        }
    }

    /// Statistics available for reference lines. Quartiles are not served.
    pub fn reference_stats(&self) -> NumericStats {
        NumericStats {
            mean: self.mean,
            std: self.std,
            p50: self.median,
            ..Default::default()
        }
    }
}

/// `GET /api/v1/eda/correlation`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResponse {
    pub features: Vec<String>,
    /// Dense matrix, row-major, `null` for undefined coefficients.
    pub matrix: Vec<Vec<Option<f64>>>,
}

/// `GET /api/v1/eda/feature-importance`
///
/// Models without importances answer with only `message` and `model_type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportanceResponse {
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub importances: Vec<f64>,
    #[serde(default)]
    pub model_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FeatureImportanceResponse {
    /// Pair names with values. Unpaired trailing entries are dropped.
    pub fn importances(&self) -> Vec<FeatureImportance> {
        if self.features.len() != self.importances.len() {
            warn!(
                features = self.features.len(),
                importances = self.importances.len(),
                "feature importance lengths differ, truncating"
            );
        }
        self.features
            .iter()
            .zip(&self.importances)
            .map(|(feature, importance)| FeatureImportance {
                feature: feature.clone(),
                importance: *importance,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Emphasis, rank_feature_importance};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_feature_importance_response() {
        let response: FeatureImportanceResponse = serde_json::from_str(
            r#"{"features": ["LSTAT", "RM", "DIS"], "importances": [0.45, 0.31, 0.07],
                "model_type": "RandomForestRegressor"}"#,
        )
        .unwrap();
        let ranked = rank_feature_importance(&response.importances());
        assert_eq!(ranked[0].feature, "LSTAT");
        assert_eq!(ranked[0].emphasis, Emphasis::Strong);
        assert_eq!(ranked[2].emphasis, Emphasis::Low);
    }

    #[test]
    fn test_model_without_importances() {
        let response: FeatureImportanceResponse = serde_json::from_str(
            r#"{"message": "Model does not have feature importances",
                "model_type": "LinearRegression"}"#,
        )
        .unwrap();
        assert!(response.importances().is_empty());
    }

    #[test]
    fn test_mismatched_importances_truncate() {
        let response = FeatureImportanceResponse {
            features: vec!["A".into(), "B".into()],
            importances: vec![0.5],
            ..Default::default()
        };
        assert_eq!(response.importances().len(), 1);
    }

    #[test]
    fn test_distribution_histogram() {
        let distribution: Distribution = serde_json::from_str(
            r#"{"feature": "RM", "bins": [3.5, 5.0, 6.5, 8.0], "counts": [20, 400, 86],
                "total": 506, "mean": 6.28, "median": 6.2, "std": 0.7}"#,
        )
        .unwrap();
        assert_eq!(distribution.histogram().counts.len(), 3);
        assert_eq!(distribution.reference_stats().p50, Some(6.2));
    }

    #[test]
    fn test_statistics_quantile_keys() {
        let stats: FeatureStatistics = serde_json::from_str(
            r#"{"feature": "CRIM", "count": 486, "mean": 3.61, "25%": 0.08, "50%": 0.25,
                "75%": 3.56, "skewness": 5.2, "kurtosis": 37.1}"#,
        )
        .unwrap();
        assert_eq!(stats.count, 486);
        assert_eq!(stats.stats.p75, Some(3.56));
    }
}
