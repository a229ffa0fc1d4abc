//! Composition of the whole EDA page from a profiling report.

use super::bars::{BarDatum, category_bars, missing_bars, type_bars};
use super::heatmap::{Heatmap, bind_heatmap};
use super::histogram::{HistogramBin, ReferenceLine, bind_histogram, reference_lines};
use super::scatter::{ScatterPanel, bind_scatter};
use crate::classify::{Kurtosis, Skewness};
use crate::config::DashboardConfig;
use crate::defect::Defect;
use crate::derive::{
    BoxPlotSummary, CategoryCount, MissingDataStats, NamedValue, NormalizedCorrelation,
    box_plot_summary, derive_p_cells_missing, derive_record_size, derive_variables_with_missing,
    missing_by_variable, missing_data_stats_checked, normalize_correlation_matrix, top_categories,
    type_distribution,
};
use crate::report::{CategoricalVariable, NumericVariable, ProfilingReport, Variable};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Correlation methods in the order the scatter badge prefers them.
const PREFERRED_METHODS: [&str; 3] = ["pearson", "auto", "spearman"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewCard {
    pub key: String,
    pub label: String,
    pub value: String,
}

impl OverviewCard {
    fn new(key: &str, label: &str, value: String) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkewnessBadge {
    pub value: f64,
    pub class: Skewness,
    pub label: String,
    pub icon: String,
    pub color: String,
}

impl SkewnessBadge {
    pub fn new(value: f64) -> Self {
        let class = Skewness::classify(value);
        Self {
            value,
            class,
            label: class.label().to_string(),
            icon: class.icon().to_string(),
            color: class.tone().color().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KurtosisBadge {
    pub value: f64,
    pub class: Kurtosis,
    pub label: String,
}

impl KurtosisBadge {
    pub fn new(value: f64) -> Self {
        let class = Kurtosis::classify(value);
        Self {
            value,
            class,
            label: class.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericCard {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    pub iqr: Option<f64>,
    pub cv: Option<f64>,
    pub skewness: Option<SkewnessBadge>,
    pub kurtosis: Option<KurtosisBadge>,
    pub box_plot: Option<BoxPlotSummary>,
    pub histogram: Vec<HistogramBin>,
    pub reference_lines: Vec<ReferenceLine>,
    pub quantiles_ordered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalCard {
    pub categories: Vec<CategoryCount>,
    pub bars: Vec<BarDatum>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariableCardBody {
    Numeric(NumericCard),
    Categorical(CategoricalCard),
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableCard {
    pub name: String,
    pub type_name: String,
    pub n_distinct: u64,
    pub n_missing: u64,
    pub p_missing: f64,
    pub body: VariableCardBody,
}

impl VariableCard {
    pub fn numeric(&self) -> Option<&NumericCard> {
        match &self.body {
            VariableCardBody::Numeric(card) => Some(card),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingVisual {
    pub key: String,
    pub name: String,
    pub caption: String,
    pub svg: String,
}

/// A defect together with where in the report it was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedDefect {
    pub location: String,
    #[serde(flatten)]
    pub defect: Defect,
}

/// Everything the EDA page renders, derived from one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableViewModel {
    pub title: String,
    pub duration_secs: Option<f64>,
    pub overview: Vec<OverviewCard>,
    pub missing: MissingDataStats,
    pub missing_bars: Vec<BarDatum>,
    pub type_distribution: Vec<NamedValue>,
    pub type_bars: Vec<BarDatum>,
    pub variables: Vec<VariableCard>,
    pub heatmaps: Vec<Heatmap>,
    pub scatter: Vec<ScatterPanel>,
    pub missing_visuals: Vec<MissingVisual>,
    pub alerts: Vec<String>,
    pub sample_rows: usize,
    pub duplicate_rows: usize,
    pub defects: Vec<LocatedDefect>,
}

impl RenderableViewModel {
    pub fn variable(&self, name: &str) -> Option<&VariableCard> {
        self.variables.iter().find(|card| card.name == name)
    }

    pub fn heatmap(&self, method: &str) -> Option<&Heatmap> {
        self.heatmaps.iter().find(|map| map.method == method)
    }
}

/// Build the view model. Pure and idempotent: the same report always yields
/// the same model, and the report is never modified.
pub fn build_view_model(report: &ProfilingReport, config: &DashboardConfig) -> RenderableViewModel {
    let mut defects = Vec::new();
    let table = &report.table;

    let (missing, missing_defect) = missing_data_stats_checked(table);
    if let Some(defect) = missing_defect {
        defects.push(LocatedDefect {
            location: "table".to_string(),
            defect,
        });
    }

    let variables: Vec<VariableCard> = report
        .variables
        .iter()
        .map(|(name, variable)| variable_card(name, variable, config, &mut defects))
        .collect();

    let normalized: Vec<(&str, NormalizedCorrelation)> = report
        .correlations
        .iter()
        .flat_map(|methods| methods.iter())
        .map(|(method, raw)| (method.as_str(), normalize_correlation_matrix(raw)))
        .collect();

    let heatmaps: Vec<Heatmap> = normalized
        .iter()
        .map(|(method, correlation)| {
            defects.extend(correlation.defects.iter().map(|defect| LocatedDefect {
                location: format!("correlations.{method}"),
                defect: defect.clone(),
            }));
            bind_heatmap(method, correlation, config.strongest_pairs)
        })
        .collect();

    let scatter = report
        .scatter
        .as_ref()
        .map(|scatter| bind_scatter(scatter, preferred_correlation(&normalized)))
        .unwrap_or_default();

    let missing_visuals = report
        .missing
        .iter()
        .flat_map(|artifacts| artifacts.iter())
        .map(|(key, artifact)| MissingVisual {
            key: key.to_string(),
            name: artifact.name.clone(),
            caption: artifact.caption.clone(),
            svg: artifact.matrix.clone(),
        })
        .collect();

    let distribution = type_distribution(table);

    debug!(
        variables = variables.len(),
        heatmaps = heatmaps.len(),
        defects = defects.len(),
        "built EDA view model"
    );

    RenderableViewModel {
        title: report.analysis.title.clone(),
        duration_secs: report
            .analysis
            .duration()
            .map(|elapsed| elapsed.num_milliseconds() as f64 / 1000.0),
        overview: overview_cards(report),
        missing,
        missing_bars: missing_bars(&missing_by_variable(&report.variables)),
        type_bars: type_bars(&distribution),
        type_distribution: distribution,
        variables,
        heatmaps,
        scatter,
        missing_visuals,
        alerts: report.alerts.clone().unwrap_or_default(),
        sample_rows: report.sample.as_ref().map_or(0, Vec::len),
        duplicate_rows: report.duplicates.as_ref().map_or(0, Vec::len),
        defects,
    }
}

fn preferred_correlation<'a>(
    normalized: &'a [(&str, NormalizedCorrelation)],
) -> Option<&'a NormalizedCorrelation> {
    PREFERRED_METHODS
        .iter()
        .find_map(|preferred| normalized.iter().find(|(method, _)| method == preferred))
        .or_else(|| normalized.first())
        .map(|(_, correlation)| correlation)
}

fn overview_cards(report: &ProfilingReport) -> Vec<OverviewCard> {
    let table = &report.table;
    vec![
        OverviewCard::new("rows", "Filas", table.n.to_string()),
        OverviewCard::new("columns", "Columnas", table.n_var.to_string()),
        OverviewCard::new("memory", "Memoria", format_bytes(table.memory_size)),
        OverviewCard::new(
            "record_size",
            "Tamaño de registro",
            format_bytes(derive_record_size(table)),
        ),
        OverviewCard::new(
            "missing_cells",
            "Celdas faltantes",
            format!(
                "{} ({:.2}%)",
                table.n_cells_missing,
                derive_p_cells_missing(table) * 100.0
            ),
        ),
        OverviewCard::new(
            "vars_with_missing",
            "Variables con faltantes",
            derive_variables_with_missing(table, &report.variables).to_string(),
        ),
        OverviewCard::new(
            "duplicates",
            "Filas duplicadas",
            format!("{} ({:.2}%)", table.n_duplicates, table.p_duplicates * 100.0),
        ),
    ]
}

fn variable_card(
    name: &str,
    variable: &Variable,
    config: &DashboardConfig,
    defects: &mut Vec<LocatedDefect>,
) -> VariableCard {
    let common = variable.common();
    let body = match variable {
        Variable::Numeric(numeric) => {
            VariableCardBody::Numeric(numeric_card(name, numeric, defects))
        }
        Variable::Categorical(categorical) => {
            VariableCardBody::Categorical(categorical_card(categorical, config))
        }
        Variable::Unknown(_) => VariableCardBody::Unsupported,
    };
    VariableCard {
        name: name.to_string(),
        type_name: variable.type_name().to_string(),
        n_distinct: common.n_distinct,
        n_missing: common.n_missing,
        p_missing: common.p_missing,
        body,
    }
}

fn numeric_card(
    name: &str,
    variable: &NumericVariable,
    defects: &mut Vec<LocatedDefect>,
) -> NumericCard {
    let stats = &variable.stats;

    let histogram = match &variable.histogram {
        Some(histogram) => {
            let binding = bind_histogram(histogram);
            if let Some(defect) = binding.defect {
                defects.push(LocatedDefect {
                    location: format!("variables.{name}.histogram"),
                    defect,
                });
            }
            binding.bins
        }
        None => Vec::new(),
    };

    let quantiles_ordered = stats.quantiles_ordered();
    if !quantiles_ordered {
        defects.push(LocatedDefect {
            location: format!("variables.{name}"),
            defect: Defect::QuantileOrder {
                variable: name.to_string(),
            },
        });
    }

    NumericCard {
        mean: stats.mean,
        std: stats.std,
        min: stats.min,
        max: stats.max,
        median: stats.p50,
        iqr: stats.iqr_or_derived(),
        cv: stats.cv,
        skewness: stats.skewness.filter(|v| v.is_finite()).map(SkewnessBadge::new),
        kurtosis: stats.kurtosis.filter(|v| v.is_finite()).map(KurtosisBadge::new),
        box_plot: box_plot_summary(stats),
        histogram,
        reference_lines: reference_lines(stats),
        quantiles_ordered,
    }
}

fn categorical_card(variable: &CategoricalVariable, config: &DashboardConfig) -> CategoricalCard {
    let categories = top_categories(variable, config.top_categories);
    CategoricalCard {
        bars: category_bars(&categories),
        categories,
    }
}

/// Human-readable byte size with 1024-based units.
pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".to_string();
    }
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{value:.0} {}", UNITS[unit])
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}
