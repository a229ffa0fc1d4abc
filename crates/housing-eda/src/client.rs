//! Async HTTP client for the housing prediction and analytics API.
//!
//! Every call is a single GET (or POST for drift detection) that decodes the
//! JSON body into the typed contracts of [`crate::report`] and
//! [`crate::external`]. Non-success statuses become [`EdaError::BadStatus`];
//! the client does not retry, callers decide via [`EdaError::is_retryable`].
//!
//! # Example
//!
//! ```rust,ignore
//! use housing_eda::{DashboardClient, DashboardConfig};
//!
//! let client = DashboardClient::new(&DashboardConfig::from_env()?)?;
//! let report = client.profiling_report().await?;
//! let drift = client.monitoring_drift(None).await?;
//! ```

use crate::config::DashboardConfig;
use crate::error::{EdaError, Result};
use crate::external::{
    CorrelationResponse, DatasetInfo, Distribution, DriftAlert, DriftInfo, FeatureDriftReport,
    FeatureImportanceResponse, FeatureStatistics, MonitoringStats, RunSummary,
};
use crate::report::ProfilingReport;
use indexmap::IndexMap;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Endpoint paths, relative to the API base URL.
pub mod endpoints {
    pub const PROFILING_REPORT: &str = "/eda/data";
    pub const MONITORING_STATS: &str = "/monitoring/stats";
    pub const MONITORING_DRIFT: &str = "/monitoring/drift";
    pub const DATASET_INFO: &str = "/api/v1/eda/dataset-info";
    pub const STATISTICS: &str = "/api/v1/eda/statistics";
    pub const DISTRIBUTION: &str = "/api/v1/eda/distribution";
    pub const CORRELATION: &str = "/api/v1/eda/correlation";
    pub const FEATURE_IMPORTANCE: &str = "/api/v1/eda/feature-importance";
    pub const RUNS: &str = "/api/v1/mlflow/runs";
    pub const FEATURE_DRIFT: &str = "/api/v1/drift/detect";
    pub const DRIFT_ALERTS: &str = "/api/v1/drift/alerts";
}

/// Default experiment whose runs are listed.
pub const DEFAULT_EXPERIMENT: &str = "housing-price-prediction";

/// Look-back window of the drift alert feed, in days, as the API bounds it.
pub const ALERT_DAYS: std::ops::RangeInclusive<u32> = 1..=30;

pub struct DashboardClient {
    base_url: String,
    client: Client,
}

impl DashboardClient {
    /// Create a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| EdaError::InvalidConfig(e.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        debug!(endpoint, "requesting");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "request failed");
            return Err(EdaError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.client.get(self.url(endpoint)).query(query);
        self.send(endpoint, request).await
    }

    /// The latest profiling artifact.
    pub async fn profiling_report(&self) -> Result<ProfilingReport> {
        self.get(endpoints::PROFILING_REPORT, &[]).await
    }

    /// Prediction counters, latency and recent activity.
    pub async fn monitoring_stats(&self) -> Result<MonitoringStats> {
        self.get(endpoints::MONITORING_STATS, &[]).await
    }

    /// Mean-shift drift of recent predictions. `threshold` is in baseline
    /// standard deviations; the server default applies when `None`.
    pub async fn monitoring_drift(&self, threshold: Option<f64>) -> Result<DriftInfo> {
        let query: Vec<(&str, String)> = threshold
            .map(|t| vec![("threshold", t.to_string())])
            .unwrap_or_default();
        self.get(endpoints::MONITORING_DRIFT, &query).await
    }

    /// KS drift of `current` samples against the training data.
    pub async fn feature_drift(
        &self,
        current: &IndexMap<String, Vec<f64>>,
    ) -> Result<FeatureDriftReport> {
        let endpoint = endpoints::FEATURE_DRIFT;
        let request = self.client.post(self.url(endpoint)).json(current);
        self.send(endpoint, request).await
    }

    /// Drift alerts of the last `days` days, clamped to [`ALERT_DAYS`].
    pub async fn drift_alerts(&self, days: u32) -> Result<Vec<DriftAlert>> {
        let days = days.clamp(*ALERT_DAYS.start(), *ALERT_DAYS.end());
        self.get(endpoints::DRIFT_ALERTS, &[("days", days.to_string())])
            .await
    }

    pub async fn runs(&self, experiment: &str, limit: u32) -> Result<Vec<RunSummary>> {
        self.get(
            endpoints::RUNS,
            &[
                ("experiment_name", experiment.to_string()),
                ("limit", limit.clamp(1, 100).to_string()),
            ],
        )
        .await
    }

    pub async fn feature_importance(&self) -> Result<FeatureImportanceResponse> {
        self.get(endpoints::FEATURE_IMPORTANCE, &[]).await
    }

    pub async fn distribution(&self, feature: &str, bins: usize) -> Result<Distribution> {
        self.get(
            endpoints::DISTRIBUTION,
            &[("feature", feature.to_string()), ("bins", bins.to_string())],
        )
        .await
    }

    pub async fn dataset_info(&self) -> Result<DatasetInfo> {
        self.get(endpoints::DATASET_INFO, &[]).await
    }

    pub async fn feature_statistics(&self, feature: &str) -> Result<FeatureStatistics> {
        self.get(endpoints::STATISTICS, &[("feature", feature.to_string())])
            .await
    }

    pub async fn correlation(&self) -> Result<CorrelationResponse> {
        self.get(endpoints::CORRELATION, &[]).await
    }
}
