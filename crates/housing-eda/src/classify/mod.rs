//! Classification layer.
//!
//! Maps continuous statistics to the discrete categories the dashboard
//! shows. Cut points are fixed and reproducible:
//!
//! - skewness: `> 1` right-skewed, `< -1` left-skewed, otherwise symmetric
//! - kurtosis: compared against 3 (non-excess convention)
//! - correlation: `|r| > 0.7` strong, `|r| >= 0.4` moderate, otherwise weak
//! - drift: `p < 0.01` high, `p < 0.05` medium, otherwise low
//!   (see [`crate::config::DriftThresholds`])
//! - feature importance: normalized by the list maximum, `> 0.7` strong, `> 0.4` medium

mod correlation;
mod drift;
mod importance;
mod shape;

pub use correlation::{
    CorrelationStrength, MODERATE_CORRELATION, NEGATIVE_RGB, PLACEHOLDER_RGB, POSITIVE_RGB, Rgba,
    STRONG_CORRELATION, correlation_color, correlation_tier,
};
pub use drift::DriftSeverity;
pub use importance::{
    Emphasis, FeatureImportance, MEDIUM_IMPORTANCE, RankedImportance, STRONG_IMPORTANCE,
    rank_feature_importance,
};
pub use shape::{
    GAUSSIAN_KURTOSIS, Kurtosis, SKEW_THRESHOLD, Skewness, Tone, classify_kurtosis,
    classify_skewness,
};
