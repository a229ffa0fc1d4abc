//! Render bindings.
//!
//! Turns derived and classified values into the flat records the dashboard
//! draws: histogram bins with reference lines, heatmap cells, scatter panels,
//! bar series and the composed [`RenderableViewModel`].
//!
//! Malformed input never aborts a render. Each binding produces what it can
//! and reports the rest as [`crate::Defect`]s.

mod bars;
mod heatmap;
mod histogram;
mod scatter;
mod view;

pub use bars::{
    BarDatum, CATEGORY_PALETTE, category_bars, importance_bars, missing_bars, type_bars,
};
pub use heatmap::{Heatmap, HeatmapCell, PLACEHOLDER, bind_heatmap};
pub use histogram::{
    HistogramBin, HistogramBinding, LineStyle, MEAN_COLOR, MEDIAN_COLOR, QUARTILE_COLOR,
    ReferenceLine, ReferenceStat, bind_histogram, reference_lines,
};
pub use scatter::{ScatterPanel, bind_scatter};
pub use view::{
    CategoricalCard, KurtosisBadge, LocatedDefect, MissingVisual, NumericCard, OverviewCard,
    RenderableViewModel, SkewnessBadge, VariableCard, VariableCardBody, build_view_model,
    format_bytes,
};
