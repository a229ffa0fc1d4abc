//! Contracts with the collaborators the dashboard displays but does not own.
//!
//! - [`monitoring`]: prediction-stream counters, drift and drift alerts
//! - [`experiments`]: tracked training runs
//! - [`analytics`]: dataset info, statistics, distributions, correlation and
//!   feature importance served by the analytics API

pub mod analytics;
pub mod experiments;
pub mod monitoring;

pub use analytics::{
    CorrelationResponse, DatasetInfo, Distribution, FeatureImportanceResponse, FeatureStatistics,
};
pub use experiments::{
    BestRun, MetricDirection, RunComparison, RunRow, RunSummary, RunTimestamp, compare_runs,
    metric_direction,
};
pub use monitoring::{
    AlertStatus, DEFAULT_MEAN_SHIFT_THRESHOLD, DriftAlert, DriftInfo, DriftRow, DriftStatus,
    FeatureDrift, FeatureDriftReport, MonitoringStats, active_alerts, drift_score_status,
};
