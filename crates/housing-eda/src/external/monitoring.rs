//! Monitoring and drift payloads from the prediction API.
//!
//! Two drift shapes exist: the mean-shift summary served by the monitoring
//! endpoint ([`DriftInfo`]) and the per-feature Kolmogorov-Smirnov report
//! ([`FeatureDriftReport`]). The same report is produced locally by
//! [`crate::source::detect_feature_drift`]. Prediction-stream counters come as
//! [`MonitoringStats`], and the alert feed as a list of [`DriftAlert`].

use crate::classify::{DriftSeverity, Tone};
use crate::config::DriftThresholds;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default number of baseline standard deviations that counts as drift.
pub const DEFAULT_MEAN_SHIFT_THRESHOLD: f64 = 2.0;

/// Counters of the prediction stream since the service started.
///
/// `prediction_stats` and `inference_stats` are open maps (mean, std,
/// percentiles, latency) and keep the order the service sends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitoringStats {
    #[serde(default)]
    pub total_predictions: u64,
    #[serde(default)]
    pub uptime_hours: f64,
    #[serde(default)]
    pub predictions_per_hour: f64,
    #[serde(default)]
    pub prediction_stats: IndexMap<String, f64>,
    #[serde(default)]
    pub inference_stats: IndexMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_prediction_time: Option<String>,
    #[serde(default)]
    pub recent_predictions: Vec<f64>,
}

impl MonitoringStats {
    pub fn is_idle(&self) -> bool {
        self.total_predictions == 0
    }

    /// Smallest and largest of the recent predictions, non-finite values ignored.
    pub fn recent_range(&self) -> Option<(f64, f64)> {
        self.recent_predictions
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Lifecycle of a drift alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
}

/// One entry of the drift alert feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftAlert {
    pub id: String,
    pub timestamp: String,
    pub severity: DriftSeverity,
    pub feature: String,
    pub drift_score: f64,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl DriftAlert {
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }
}

/// Active alerts, most severe first. Equal severities keep feed order.
pub fn active_alerts(alerts: &[DriftAlert]) -> Vec<&DriftAlert> {
    let mut active: Vec<&DriftAlert> = alerts.iter().filter(|a| a.is_active()).collect();
    active.sort_by_key(|a| std::cmp::Reverse(a.severity));
    active
}

/// Mean-shift drift of the prediction stream against a configured baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftInfo {
    #[serde(default)]
    pub drift_detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_std: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_mean: Option<f64>,
    #[serde(default)]
    pub baseline_configured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl DriftInfo {
    pub fn threshold_or_default(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_MEAN_SHIFT_THRESHOLD)
    }

    /// Absolute shift of the current mean from the baseline.
    pub fn mean_shift(&self) -> Option<f64> {
        Some((self.current_mean? - self.baseline_mean?).abs())
    }
}

/// State of the drift badge on the monitoring panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DriftStatus {
    Drift { score: f64 },
    Ok,
    NoBaseline,
}

impl DriftStatus {
    pub fn badge(&self) -> String {
        match self {
            Self::Drift { score } => format!("DRIFT {score:.2}"),
            Self::Ok => "OK".to_string(),
            Self::NoBaseline => "no baseline".to_string(),
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Drift { .. } => Tone::Danger,
            Self::Ok => Tone::Success,
            Self::NoBaseline => Tone::Neutral,
        }
    }
}

/// Badge state for a monitoring drift payload.
///
/// A payload without a configured baseline never reports drift, whatever its
/// other fields say.
pub fn drift_score_status(info: &DriftInfo) -> DriftStatus {
    if !info.baseline_configured {
        return DriftStatus::NoBaseline;
    }
    if info.drift_detected {
        DriftStatus::Drift {
            score: info.drift_score.unwrap_or(0.0),
        }
    } else {
        DriftStatus::Ok
    }
}

/// KS result for one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDrift {
    pub has_drift: bool,
    pub p_value: f64,
    pub statistic: f64,
    /// Severity as reported by the service; classified locally when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<DriftSeverity>,
}

/// Per-feature drift between the training data and a current sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureDriftReport {
    #[serde(default)]
    pub overall_drift: bool,
    /// Share of tested features that drifted.
    #[serde(default)]
    pub drift_score: f64,
    #[serde(default)]
    pub features: IndexMap<String, FeatureDrift>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A feature row of the drift table, severity settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftRow {
    pub feature: String,
    pub has_drift: bool,
    pub p_value: f64,
    pub statistic: f64,
    pub severity: DriftSeverity,
    pub color: String,
}

impl FeatureDriftReport {
    /// Table rows in report order, each with a definite severity.
    pub fn rows(&self, thresholds: &DriftThresholds) -> Vec<DriftRow> {
        self.features
            .iter()
            .map(|(feature, drift)| {
                let severity = DriftSeverity::resolve(drift.severity, drift.p_value, thresholds);
                DriftRow {
                    feature: feature.to_string(),
                    has_drift: drift.has_drift,
                    p_value: drift.p_value,
                    statistic: drift.statistic,
                    severity,
                    color: severity.tone().color().to_string(),
                }
            })
            .collect()
    }

    pub fn drifted_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|(_, drift)| drift.has_drift)
            .map(|(feature, _)| feature.as_str())
            .collect()
    }
}
