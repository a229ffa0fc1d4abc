//! Derivation layer.
//!
//! Pure functions that fill in fields the artifact may omit and normalize
//! shape variants, so the classification and rendering layers consume a
//! single shape. Nothing here mutates the report; every value is recomputed
//! from the immutable source on each call.
//!
//! | Function | Fallback |
//! |----------|----------|
//! | [`derive_record_size`] | `memory_size / n`, `0` for empty tables |
//! | [`derive_p_cells_missing`] | `n_cells_missing / (n * n_var)` |
//! | [`derive_variables_with_missing`] | count of variables with `n_missing > 0` |
//! | [`normalize_correlation_matrix`] | `NaN` cells plus [`crate::Defect`]s |

mod correlation;
mod table;
mod variables;

pub use correlation::{CorrelationPair, NormalizedCorrelation, normalize_correlation_matrix};
pub use table::{
    MissingDataStats, NamedValue, derive_p_cells_missing, derive_record_size,
    derive_variables_with_missing, missing_data_stats, missing_data_stats_checked,
    type_distribution,
};
pub use variables::{
    BoxPlotSummary, CategoryCount, MissingBar, OTHER_CATEGORIES_LABEL, box_plot_summary,
    categorical_variables, missing_by_variable, numeric_variables, top_categories,
};
