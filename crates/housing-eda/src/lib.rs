//! Housing EDA Report Library
//!
//! Ingests the exploratory-data-analysis artifact of the housing-price
//! pipeline and turns it into chart-ready structures for the dashboard.
//!
//! # Overview
//!
//! Data flows through four pure layers:
//!
//! - **Report**: typed, order-preserving schema of the profiling artifact
//! - **Derivation**: fills fields the artifact may omit, normalizes correlation matrices
//! - **Classification**: skewness/kurtosis labels, correlation tiers and colours,
//!   drift severity, feature-importance emphasis
//! - **Rendering**: histogram bins, reference lines, heatmap cells, scatter
//!   badges, bar series, and the composed [`RenderableViewModel`]
//!
//! Around them sit the collaborator contracts ([`external`]), stale-response
//! shadowing for feature selections ([`selection`]), a Polars-backed local
//! [`source`] that profiles a CSV the way the pipeline does, and an async
//! [`DashboardClient`] (feature `fetch`, on by default).
//!
//! Malformed artifact shapes never fail a render: they degrade to placeholders
//! and are listed as [`Defect`]s. Only I/O, fetch and configuration problems
//! surface as [`EdaError`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use housing_eda::{DashboardConfig, ProfilingReport, build_view_model};
//!
//! let report = ProfilingReport::from_json(&std::fs::read_to_string("eda_data.json")?)?;
//! let view = build_view_model(&report, &DashboardConfig::default());
//!
//! for card in &view.variables {
//!     if let Some(numeric) = card.numeric() {
//!         println!("{}: {:?}", card.name, numeric.skewness.as_ref().map(|s| &s.label));
//!     }
//! }
//! for defect in &view.defects {
//!     eprintln!("{}: {}", defect.location, defect.defect);
//! }
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use housing_eda::config::{DashboardConfig, DriftThresholds};
//!
//! let config = DashboardConfig::builder()
//!     .api_base_url("http://localhost:8000")
//!     .histogram_bins(20)
//!     .drift_thresholds(DriftThresholds { high: 0.01, medium: 0.05 })
//!     .build()?;
//! ```

pub mod classify;
pub mod config;
pub mod defect;
pub mod derive;
pub mod error;
pub mod external;
pub mod render;
pub mod report;
pub mod selection;
pub mod source;

#[cfg(feature = "fetch")]
pub mod client;

// Re-exports for convenient access
pub use classify::{
    CorrelationStrength, DriftSeverity, Emphasis, FeatureImportance, Kurtosis, RankedImportance,
    Skewness, Tone, classify_kurtosis, classify_skewness, correlation_color, correlation_tier,
    rank_feature_importance,
};
pub use config::{ConfigValidationError, DashboardConfig, DashboardConfigBuilder, DriftThresholds};
pub use defect::Defect;
pub use derive::{
    MissingDataStats, NormalizedCorrelation, derive_p_cells_missing, derive_record_size,
    derive_variables_with_missing, missing_data_stats, normalize_correlation_matrix,
};
pub use error::{EdaError, Result, ResultExt};
pub use external::{
    DriftAlert, DriftInfo, FeatureDriftReport, MonitoringStats, RunSummary, active_alerts,
    compare_runs, drift_score_status,
};
pub use render::{
    HistogramBin, ReferenceLine, RenderableViewModel, bind_heatmap, bind_histogram, bind_scatter,
    build_view_model, reference_lines,
};
pub use report::{ProfilingReport, Variable};
pub use selection::{SelectionGate, SelectionTicket};

#[cfg(feature = "fetch")]
pub use client::DashboardClient;
