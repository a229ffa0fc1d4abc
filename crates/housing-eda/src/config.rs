//! Configuration for report rendering, local recomputation and fetching.
//!
//! The classification cut points for skewness, kurtosis, correlation strength
//! and feature importance are part of the visual contract and are not
//! configurable. The drift p-value cut points are a contract with the drift
//! detection service and live here as [`DriftThresholds`].

use serde::{Deserialize, Serialize};

/// Default base URL of the housing prediction API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding [`DashboardConfig::api_base_url`].
pub const ENV_API_URL: &str = "EDA_API_URL";
/// Environment variable overriding [`DashboardConfig::request_timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "EDA_TIMEOUT_SECS";
/// Environment variable overriding [`DashboardConfig::histogram_bins`].
pub const ENV_HISTOGRAM_BINS: &str = "EDA_HISTOGRAM_BINS";

/// P-value cut points shared with the drift detection service.
///
/// `p < high` is high severity, `p < medium` is medium, anything else is low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self {
            high: 0.01,
            medium: 0.05,
        }
    }
}

/// Configuration for the EDA dashboard core.
///
/// Use [`DashboardConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use housing_eda::config::DashboardConfig;
///
/// let config = DashboardConfig::builder()
///     .api_base_url("http://api.internal:8000")
///     .histogram_bins(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the prediction/analytics API.
    /// Default: "http://localhost:8000"
    pub api_base_url: String,

    /// Request timeout for every fetch, in seconds.
    /// Default: 30
    pub request_timeout_secs: u64,

    /// Number of histogram bins used when profiling a CSV locally.
    /// Default: 30
    pub histogram_bins: usize,

    /// Drift severity cut points.
    pub drift_thresholds: DriftThresholds,

    /// Significance level of the per-feature KS drift test.
    /// Default: 0.05
    pub drift_significance: f64,

    /// Share of drifted features above which the dataset counts as drifted.
    /// Default: 0.3
    pub overall_drift_ratio: f64,

    /// Absolute correlation above which the local profiler raises an alert.
    /// Default: 0.9
    pub high_correlation_alert: f64,

    /// Number of categories shown before folding the rest into "Otros".
    /// Default: 10
    pub top_categories: usize,

    /// Number of strongest correlation pairs listed per method.
    /// Default: 5
    pub strongest_pairs: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            histogram_bins: 30,
            drift_thresholds: DriftThresholds::default(),
            drift_significance: 0.05,
            overall_drift_ratio: 0.3,
            high_correlation_alert: 0.9,
            top_categories: 10,
            strongest_pairs: 5,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Build a configuration from the process environment.
    ///
    /// Unset variables keep their defaults; set but unparsable variables are
    /// reported rather than ignored.
    pub fn from_env() -> Result<Self, ConfigValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigValidationError> {
        let mut builder = Self::builder();

        if let Some(url) = lookup(ENV_API_URL) {
            builder = builder.api_base_url(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse().map_err(|_| ConfigValidationError::InvalidEnv {
                key: ENV_TIMEOUT_SECS.to_string(),
                value: raw.clone(),
            })?;
            builder = builder.request_timeout_secs(secs);
        }
        if let Some(raw) = lookup(ENV_HISTOGRAM_BINS) {
            let bins = raw.trim().parse().map_err(|_| ConfigValidationError::InvalidEnv {
                key: ENV_HISTOGRAM_BINS.to_string(),
                value: raw.clone(),
            })?;
            builder = builder.histogram_bins(bins);
        }

        builder.build()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "request_timeout_secs".to_string(),
                value: 0,
            });
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "histogram_bins".to_string(),
                value: 0,
            });
        }

        for (field, value) in [
            ("drift_thresholds.high", self.drift_thresholds.high),
            ("drift_thresholds.medium", self.drift_thresholds.medium),
            ("drift_significance", self.drift_significance),
            ("overall_drift_ratio", self.overall_drift_ratio),
            ("high_correlation_alert", self.high_correlation_alert),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.drift_thresholds.high > self.drift_thresholds.medium {
            return Err(ConfigValidationError::UnorderedDriftThresholds {
                high: self.drift_thresholds.high,
                medium: self.drift_thresholds.medium,
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidCount { field: String, value: u64 },

    #[error("Drift thresholds out of order: high {high} must not exceed medium {medium}")]
    UnorderedDriftThresholds { high: f64, medium: f64 },

    #[error("API base URL must not be empty")]
    EmptyBaseUrl,

    #[error("Environment variable {key} has invalid value '{value}'")]
    InvalidEnv { key: String, value: String },
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    histogram_bins: Option<usize>,
    drift_thresholds: Option<DriftThresholds>,
    drift_significance: Option<f64>,
    overall_drift_ratio: Option<f64>,
    high_correlation_alert: Option<f64>,
    top_categories: Option<usize>,
    strongest_pairs: Option<usize>,
}

impl DashboardConfigBuilder {
    /// Set the base URL of the analytics API.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Set the number of histogram bins for local profiling.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the drift severity cut points.
    ///
    /// These must match the drift detection service, otherwise locally
    /// recomputed severities disagree with the ones it reports.
    pub fn drift_thresholds(mut self, thresholds: DriftThresholds) -> Self {
        self.drift_thresholds = Some(thresholds);
        self
    }

    /// Set the significance level of the per-feature drift test.
    pub fn drift_significance(mut self, alpha: f64) -> Self {
        self.drift_significance = Some(alpha);
        self
    }

    /// Set the share of drifted features that flags the whole dataset.
    pub fn overall_drift_ratio(mut self, ratio: f64) -> Self {
        self.overall_drift_ratio = Some(ratio);
        self
    }

    /// Set the absolute correlation that raises a local profiler alert.
    pub fn high_correlation_alert(mut self, threshold: f64) -> Self {
        self.high_correlation_alert = Some(threshold);
        self
    }

    /// Set how many categories are listed per categorical variable.
    pub fn top_categories(mut self, limit: usize) -> Self {
        self.top_categories = Some(limit);
        self
    }

    /// Set how many strongest correlation pairs are listed.
    pub fn strongest_pairs(mut self, limit: usize) -> Self {
        self.strongest_pairs = Some(limit);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DashboardConfig` or an error if validation fails.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let defaults = DashboardConfig::default();
        let config = DashboardConfig {
            api_base_url: self.api_base_url.unwrap_or(defaults.api_base_url),
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            drift_thresholds: self.drift_thresholds.unwrap_or(defaults.drift_thresholds),
            drift_significance: self
                .drift_significance
                .unwrap_or(defaults.drift_significance),
            overall_drift_ratio: self
                .overall_drift_ratio
                .unwrap_or(defaults.overall_drift_ratio),
            high_correlation_alert: self
                .high_correlation_alert
                .unwrap_or(defaults.high_correlation_alert),
            top_categories: self.top_categories.unwrap_or(defaults.top_categories),
            strongest_pairs: self.strongest_pairs.unwrap_or(defaults.strongest_pairs),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.drift_thresholds.high, 0.01);
        assert_eq!(config.drift_thresholds.medium, 0.05);
        assert_eq!(config.overall_drift_ratio, 0.3);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = DashboardConfig::builder()
            .api_base_url("http://api:9000")
            .histogram_bins(12)
            .top_categories(3)
            .build()
            .unwrap();

        assert_eq!(config.api_base_url, "http://api:9000");
        assert_eq!(config.histogram_bins, 12);
        assert_eq!(config.top_categories, 3);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_validation_zero_bins() {
        let result = DashboardConfig::builder().histogram_bins(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidCount { .. }
        ));
    }

    #[test]
    fn test_validation_unordered_drift_thresholds() {
        let result = DashboardConfig::builder()
            .drift_thresholds(DriftThresholds {
                high: 0.1,
                medium: 0.05,
            })
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::UnorderedDriftThresholds { .. }
        ));
    }

    #[test]
    fn test_validation_threshold_range() {
        let result = DashboardConfig::builder().drift_significance(1.5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://monitor:8000"),
            (ENV_HISTOGRAM_BINS, "15"),
        ]);
        let config =
            DashboardConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_base_url, "http://monitor:8000");
        assert_eq!(config.histogram_bins, 15);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_from_lookup_invalid_value() {
        let result = DashboardConfig::from_lookup(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidEnv { .. }
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = DashboardConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: DashboardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.drift_thresholds, deserialized.drift_thresholds);
        assert_eq!(config.histogram_bins, deserialized.histogram_bins);
    }
}
