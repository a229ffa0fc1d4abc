//! Per-variable derivations: type filters, box plots, missing bars, top categories.

use crate::report::{CategoricalVariable, NumericStats, NumericVariable, Variable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label of the bucket that collects categories beyond the display limit.
pub const OTHER_CATEGORIES_LABEL: &str = "Otros";

/// Numeric variables in column order. The iterator is lazy and `Clone`.
pub fn numeric_variables(
    variables: &IndexMap<String, Variable>,
) -> impl Iterator<Item = (&str, &NumericVariable)> + Clone {
    variables.iter().filter_map(|(name, variable)| {
        variable
            .as_numeric()
            .map(|numeric| (name.as_str(), numeric))
    })
}

/// Categorical variables in column order. The iterator is lazy and `Clone`.
pub fn categorical_variables(
    variables: &IndexMap<String, Variable>,
) -> impl Iterator<Item = (&str, &CategoricalVariable)> + Clone {
    variables.iter().filter_map(|(name, variable)| {
        variable
            .as_categorical()
            .map(|categorical| (name.as_str(), categorical))
    })
}

/// Five-number summary with Tukey fences clamped to the observed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

impl BoxPlotSummary {
    /// Whether the observed range reaches past either fence.
    pub fn has_outliers(&self) -> bool {
        let reach = 1.5 * (self.q3 - self.q1);
        self.min < self.q1 - reach || self.max > self.q3 + reach
    }
}

/// Box-plot summary, or `None` when any of min/quartiles/max is missing.
pub fn box_plot_summary(stats: &NumericStats) -> Option<BoxPlotSummary> {
    let (min, q1, median, q3, max) = (stats.min?, stats.p25?, stats.p50?, stats.p75?, stats.max?);
    let iqr = q3 - q1;
    Some(BoxPlotSummary {
        min,
        q1,
        median,
        q3,
        max,
        lower_fence: (q1 - 1.5 * iqr).max(min),
        upper_fence: (q3 + 1.5 * iqr).min(max),
    })
}

/// One bar of the per-variable missing-values chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingBar {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

/// Variables with missing values, in column order.
pub fn missing_by_variable(variables: &IndexMap<String, Variable>) -> Vec<MissingBar> {
    variables
        .iter()
        .filter_map(|(name, variable)| {
            let common = variable.common();
            if common.n_missing == 0 {
                return None;
            }
            let share = if common.p_missing > 0.0 {
                common.p_missing
            } else {
                let observed = common.count + common.n_missing;
                common.n_missing as f64 / observed as f64
            };
            Some(MissingBar {
                name: name.to_string(),
                count: common.n_missing,
                percentage: share * 100.0,
            })
        })
        .collect()
}

/// A category and its share of the non-missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
    pub share: f64,
}

/// The `limit` most frequent categories, the rest folded into [`OTHER_CATEGORIES_LABEL`].
///
/// Value counts carry no order, so ties are broken by label to keep the
/// output stable across renders.
pub fn top_categories(variable: &CategoricalVariable, limit: usize) -> Vec<CategoryCount> {
    let mut counts: Vec<(&str, u64)> = variable
        .value_counts_without_nan
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let total: u64 = counts.iter().map(|(_, count)| count).sum();
    let share = |count: u64| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    };

    let folded: u64 = counts.iter().skip(limit).map(|(_, count)| count).sum();
    let mut top: Vec<CategoryCount> = counts
        .iter()
        .take(limit)
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count: *count,
            share: share(*count),
        })
        .collect();

    if counts.len() > limit {
        top.push(CategoryCount {
            label: OTHER_CATEGORIES_LABEL.to_string(),
            count: folded,
            share: share(folded),
        });
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CommonStats, UnknownVariable};
    use pretty_assertions::assert_eq;

    fn numeric(n_missing: u64) -> Variable {
        Variable::Numeric(NumericVariable {
            common: CommonStats {
                n_missing,
                count: 100 - n_missing,
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn categorical(counts: &[(&str, u64)]) -> CategoricalVariable {
        CategoricalVariable {
            common: CommonStats::default(),
            value_counts_without_nan: counts
                .iter()
                .map(|(label, count)| (label.to_string(), *count))
                .collect(),
        }
    }

    fn sample_variables() -> IndexMap<String, Variable> {
        [
            ("CRIM", numeric(20)),
            ("CHAS", Variable::Categorical(categorical(&[("0", 452), ("1", 34)]))),
            ("ZN", numeric(0)),
            (
                "NOTE",
                Variable::Unknown(UnknownVariable {
                    type_name: "Text".to_string(),
                    common: CommonStats::default(),
                }),
            ),
        ]
        .into_iter()
        .map(|(name, variable)| (name.to_string(), variable))
        .collect()
    }

    #[test]
    fn test_type_filters_keep_order() {
        let variables = sample_variables();
        let numeric: Vec<&str> = numeric_variables(&variables).map(|(name, _)| name).collect();
        assert_eq!(numeric, vec!["CRIM", "ZN"]);

        let categorical: Vec<&str> = categorical_variables(&variables)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(categorical, vec!["CHAS"]);
    }

    #[test]
    fn test_type_filter_is_restartable() {
        let variables = sample_variables();
        let iter = numeric_variables(&variables);
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn test_box_plot_fences_clamped() {
        let stats = NumericStats {
            min: Some(0.0),
            p25: Some(10.0),
            p50: Some(12.0),
            p75: Some(14.0),
            max: Some(40.0),
            ..Default::default()
        };
        let summary = box_plot_summary(&stats).unwrap();
        assert_eq!(summary.lower_fence, 4.0);
        assert_eq!(summary.upper_fence, 20.0);
        assert!(summary.has_outliers());
    }

    #[test]
    fn test_box_plot_requires_quartiles() {
        let stats = NumericStats {
            min: Some(0.0),
            max: Some(1.0),
            ..Default::default()
        };
        assert_eq!(box_plot_summary(&stats), None);
    }

    #[test]
    fn test_missing_by_variable() {
        let bars = missing_by_variable(&sample_variables());
        assert_eq!(
            bars,
            vec![MissingBar {
                name: "CRIM".to_string(),
                count: 20,
                percentage: 20.0
            }]
        );
    }

    #[test]
    fn test_top_categories_folds_tail() {
        let variable = categorical(&[("b", 5), ("a", 5), ("c", 8), ("d", 2)]);
        let top = top_categories(&variable, 2);
        let labels: Vec<&str> = top.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["c", "a", OTHER_CATEGORIES_LABEL]);
        assert_eq!(top[2].count, 7);
        assert!((top.iter().map(|c| c.share).sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_categories_without_tail() {
        let variable = categorical(&[("0", 452), ("1", 34)]);
        let top = top_categories(&variable, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].label, "0");
    }
}
