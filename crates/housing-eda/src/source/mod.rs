//! Local data source backed by Polars.
//!
//! Recomputes, from the housing CSV itself, what the analytics API serves:
//! a full [`ProfilingReport`](crate::report::ProfilingReport), the per-feature
//! endpoint payloads and KS drift against a baseline. Useful offline and as
//! a cross-check of a collaborator's artifact.
//!
//! # Example
//!
//! ```rust,ignore
//! use housing_eda::{DashboardConfig, build_view_model, source};
//!
//! let config = DashboardConfig::default();
//! let report = source::profile_csv("data/housing.csv", &config)?;
//! let view = build_view_model(&report, &config);
//! ```

mod drift;
mod loader;
mod profiler;
mod stats;

pub use drift::{KsResult, detect_feature_drift, detect_frame_drift, ks_two_sample};
pub use loader::{load_csv, numeric_column_names, numeric_values, parse_csv};
pub use profiler::{
    correlation, dataset_info, distribution, feature_statistics, profile_csv, profile_dataframe,
};
