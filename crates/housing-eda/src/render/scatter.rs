//! Scatter panels: collaborator SVGs with a caption and correlation badge.
//!
//! The point clouds arrive pre-rendered. This binding only cross-references
//! the normalized correlation for the badge.

use super::heatmap::PLACEHOLDER;
use crate::classify::{CorrelationStrength, correlation_color};
use crate::derive::NormalizedCorrelation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPanel {
    pub source: String,
    pub target: String,
    pub caption: String,
    /// Opaque SVG markup from the profiler.
    pub svg: String,
    pub correlation: Option<f64>,
    pub strength: CorrelationStrength,
    /// `"r = 0.70 (moderate)"`, or a placeholder when no coefficient is known.
    pub badge: String,
    pub badge_color: String,
}

/// One panel per `(source, target)` pair, skipping self pairs, in report order.
///
/// The coefficient is looked up by name in `correlation`; pairs it does not
/// cover get a placeholder badge.
pub fn bind_scatter(
    scatter: &IndexMap<String, IndexMap<String, String>>,
    correlation: Option<&NormalizedCorrelation>,
) -> Vec<ScatterPanel> {
    scatter
        .iter()
        .flat_map(|(source, targets)| {
            targets
                .iter()
                .filter(move |(target, _)| *target != source)
                .map(move |(target, svg)| {
                    let value = correlation
                        .and_then(|c| c.get(source, target))
                        .filter(|v| v.is_finite());
                    scatter_panel(source, target, svg, value)
                })
        })
        .collect()
}

fn scatter_panel(source: &str, target: &str, svg: &str, correlation: Option<f64>) -> ScatterPanel {
    let strength = CorrelationStrength::classify(correlation.unwrap_or(f64::NAN));
    let badge = match correlation {
        Some(r) => format!("r = {r:.2} ({strength})"),
        None => format!("r = {PLACEHOLDER}"),
    };
    ScatterPanel {
        source: source.to_string(),
        target: target.to_string(),
        caption: format!("{target} vs {source}"),
        svg: svg.to_string(),
        correlation,
        strength,
        badge,
        badge_color: correlation_color(correlation.unwrap_or(f64::NAN)).css(),
    }
}
