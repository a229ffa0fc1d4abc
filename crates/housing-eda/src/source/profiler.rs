//! Local profiling of a housing CSV.
//!
//! Builds the same [`ProfilingReport`] the external pipeline writes, plus the
//! analytics endpoint payloads, directly from a DataFrame. Only the fields the
//! dashboard renders are computed; pre-rendered SVG visuals are left out.

use super::loader::{column_f64, is_categorical, is_numeric, load_csv};
use super::stats;
use crate::config::DashboardConfig;
use crate::error::{EdaError, Result};
use crate::external::{CorrelationResponse, DatasetInfo, Distribution, FeatureStatistics};
use crate::report::{
    Analysis, CategoricalVariable, CommonStats, CorrelationMatrix, NumericStats, NumericVariable,
    ProfilingReport, Table, UnknownVariable, Variable,
};
use anofox_statistics::correlation::{pearson, spearman};
use indexmap::IndexMap;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Share of zeros above which a numeric column is flagged.
const ZEROS_ALERT_RATIO: f64 = 0.5;

/// Fewest complete pairs a correlation coefficient is computed from.
const MIN_CORRELATION_PAIRS: usize = 3;

/// Confidence level handed to the correlation tests.
const CORRELATION_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CorrelationMethod {
    Pearson,
    Spearman,
}

impl CorrelationMethod {
    fn name(self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
        }
    }

    /// `None` when the test rejects the input, e.g. a constant side.
    fn estimate(self, x: &[f64], y: &[f64]) -> Option<f64> {
        let estimate = match self {
            Self::Pearson => pearson(x, y, Some(CORRELATION_CONFIDENCE)).ok()?.estimate,
            Self::Spearman => spearman(x, y, Some(CORRELATION_CONFIDENCE)).ok()?.estimate,
        };
        estimate.is_finite().then(|| estimate.clamp(-1.0, 1.0))
    }
}

/// Profile a CSV file. The report title is the file stem.
pub fn profile_csv(path: impl AsRef<Path>, config: &DashboardConfig) -> Result<ProfilingReport> {
    let path = path.as_ref();
    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    let df = load_csv(path)?;
    profile_dataframe(&df, &title, config)
}

pub fn profile_dataframe(
    df: &DataFrame,
    title: &str,
    config: &DashboardConfig,
) -> Result<ProfilingReport> {
    if df.width() == 0 {
        return Err(EdaError::EmptyData(format!("'{title}' has no columns")));
    }
    let started = chrono::Utc::now();
    let n = df.height() as u64;

    let mut variables = IndexMap::new();
    let mut numeric: Vec<(String, Vec<Option<f64>>)> = Vec::new();
    let mut alerts = Vec::new();
    let mut types: IndexMap<String, u64> = IndexMap::new();

    for column in df.get_columns() {
        let name = column.name().to_string();
        let variable = if is_numeric(column.dtype()) {
            let cells = column_cells(column)?;
            let variable = numeric_variable(&name, &cells, n, config)?;
            numeric_alerts(&name, &variable, &mut alerts);
            numeric.push((name.clone(), cells));
            Variable::Numeric(variable)
        } else if is_categorical(column.dtype()) {
            Variable::Categorical(categorical_variable(column, n)?)
        } else {
            Variable::Unknown(UnknownVariable {
                type_name: "Unsupported".to_string(),
                common: common_stats(column.null_count() as u64, n, 0),
            })
        };
        let common = variable.common();
        if common.n_missing > 0 {
            alerts.push(format!(
                "{name} has {} ({:.1}%) missing values",
                common.n_missing,
                common.p_missing * 100.0
            ));
        }
        let count = types.get(variable.type_name()).copied().unwrap_or(0);
        types.insert(variable.type_name().to_string(), count + 1);
        variables.insert(name, variable);
    }

    let pearson_matrix = correlation_rows(&numeric, CorrelationMethod::Pearson);
    correlation_alerts(&pearson_matrix, config.high_correlation_alert, &mut alerts);

    let n_duplicates = count_duplicate_rows(df)?;
    if n_duplicates > 0 {
        alerts.push(format!(
            "Dataset has {n_duplicates} ({:.1}%) duplicate rows",
            ratio(n_duplicates, n) * 100.0
        ));
    }

    let n_cells_missing: u64 = variables.values().map(|v| v.common().n_missing).sum();
    let n_var = df.width() as u64;
    let memory_size = df.estimated_size() as f64;
    let table = Table {
        n,
        n_var,
        memory_size,
        record_size: (n > 0).then(|| memory_size / n as f64),
        n_cells_missing,
        p_cells_missing: Some(ratio(n_cells_missing, n * n_var)),
        n_vars_with_missing: Some(
            variables
                .values()
                .filter(|v| v.common().n_missing > 0)
                .count() as u64,
        ),
        n_vars_all_missing: Some(
            variables
                .values()
                .filter(|v| n > 0 && v.common().n_missing == n)
                .count() as u64,
        ),
        types,
        n_duplicates,
        p_duplicates: ratio(n_duplicates, n),
    };

    let mut correlations = IndexMap::new();
    if !pearson_matrix.0.is_empty() {
        let spearman_matrix = correlation_rows(&numeric, CorrelationMethod::Spearman);
        correlations.insert(CorrelationMethod::Pearson.name().to_string(), pearson_matrix);
        correlations.insert(CorrelationMethod::Spearman.name().to_string(), spearman_matrix);
    }

    info!(
        title,
        rows = n,
        columns = n_var,
        alerts = alerts.len(),
        "profiled dataset"
    );

    Ok(ProfilingReport {
        analysis: Analysis {
            title: title.to_string(),
            date_start: Some(started.to_rfc3339()),
            date_end: Some(chrono::Utc::now().to_rfc3339()),
        },
        table,
        variables,
        scatter: None,
        correlations: (!correlations.is_empty()).then_some(correlations),
        missing: None,
        alerts: Some(alerts),
        sample: None,
        duplicates: None,
    })
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Per-row values with nulls and non-finite numbers as `None`.
fn column_cells(column: &Column) -> Result<Vec<Option<f64>>> {
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

fn common_stats(n_missing: u64, n: u64, n_distinct: u64) -> CommonStats {
    let count = n - n_missing.min(n);
    CommonStats {
        n_distinct,
        p_distinct: ratio(n_distinct, count),
        n_missing,
        p_missing: ratio(n_missing, n),
        count,
    }
}

fn numeric_stats(values: &[f64]) -> NumericStats {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q = |p: f64| stats::quantile(&sorted, p);
    let mean = stats::mean(values);
    let std = stats::std_dev(values);
    let n_zeros = values.iter().filter(|v| **v == 0.0).count() as u64;

    NumericStats {
        mean,
        std,
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        p5: q(0.05),
        p25: q(0.25),
        p50: q(0.5),
        p75: q(0.75),
        p95: q(0.95),
        iqr: q(0.75).zip(q(0.25)).map(|(q3, q1)| q3 - q1),
        cv: mean
            .zip(std)
            .and_then(|(m, s)| (m != 0.0).then(|| s / m.abs())),
        skewness: stats::skewness(values),
        kurtosis: stats::kurtosis(values),
        n_zeros: Some(n_zeros),
        p_zeros: Some(ratio(n_zeros, values.len() as u64)),
    }
}

fn numeric_variable(
    name: &str,
    cells: &[Option<f64>],
    n: u64,
    config: &DashboardConfig,
) -> Result<NumericVariable> {
    let values: Vec<f64> = cells.iter().flatten().copied().collect();
    let n_distinct = Series::new(name.into(), values.as_slice()).n_unique()? as u64;
    Ok(NumericVariable {
        common: common_stats(n - values.len() as u64, n, n_distinct),
        stats: numeric_stats(&values),
        histogram: (!values.is_empty()).then(|| stats::histogram(&values, config.histogram_bins)),
    })
}

/// Category counts, most frequent first.
fn categorical_variable(column: &Column, n: u64) -> Result<CategoricalVariable> {
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let non_null = series.drop_nulls();

    let mut value_counts = IndexMap::new();
    if !non_null.is_empty() {
        let counts_df = non_null.value_counts(true, false, "count".into(), false)?;
        let labels = counts_df.column(non_null.name())?.str()?;
        let counts = counts_df.column("count")?.cast(&DataType::UInt64)?;
        for (label, count) in labels.into_iter().zip(counts.u64()?) {
            if let (Some(label), Some(count)) = (label, count) {
                value_counts.insert(label.to_string(), count);
            }
        }
    }

    Ok(CategoricalVariable {
        common: common_stats(series.null_count() as u64, n, non_null.n_unique()? as u64),
        value_counts_without_nan: value_counts,
    })
}

fn numeric_alerts(name: &str, variable: &NumericVariable, alerts: &mut Vec<String>) {
    let stats = &variable.stats;
    if let Some(skew) = stats.skewness.filter(|s| s.abs() > crate::classify::SKEW_THRESHOLD) {
        alerts.push(format!("{name} is highly skewed (\u{3b3}1 = {skew:.2})"));
    }
    if let (Some(zeros), Some(p)) = (stats.n_zeros, stats.p_zeros)
        && p > ZEROS_ALERT_RATIO
    {
        alerts.push(format!("{name} has {zeros} ({:.1}%) zeros", p * 100.0));
    }
    if variable.common.n_distinct == 1 {
        alerts.push(format!("{name} has constant value"));
    }
}

/// Pairwise-complete correlation matrix in row-object encoding.
///
/// Each pair is computed once and mirrored. Pairs with fewer than
/// [`MIN_CORRELATION_PAIRS`] complete observations stay `None`.
fn correlation_rows(
    columns: &[(String, Vec<Option<f64>>)],
    method: CorrelationMethod,
) -> CorrelationMatrix {
    let size = columns.len();
    let mut values: Vec<Vec<Option<f64>>> = vec![vec![None; size]; size];

    for i in 0..size {
        let present = columns[i].1.iter().flatten().count();
        values[i][i] = (present >= MIN_CORRELATION_PAIRS).then_some(1.0);

        for j in (i + 1)..size {
            let mut x = Vec::new();
            let mut y = Vec::new();
            for (a, b) in columns[i].1.iter().zip(&columns[j].1) {
                if let (Some(a), Some(b)) = (a, b) {
                    x.push(*a);
                    y.push(*b);
                }
            }
            if x.len() < MIN_CORRELATION_PAIRS {
                continue;
            }
            let estimate = method.estimate(&x, &y);
            values[i][j] = estimate;
            values[j][i] = estimate;
        }
    }

    let rows = values
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .map(|(name, _)| name.clone())
                .zip(row)
                .collect()
        })
        .collect();
    debug!(method = method.name(), features = size, "computed correlation matrix");
    CorrelationMatrix(rows)
}

fn correlation_alerts(matrix: &CorrelationMatrix, threshold: f64, alerts: &mut Vec<String>) {
    let names: Vec<&String> = matrix.0.first().map(|row| row.keys().collect()).unwrap_or_default();
    for (i, row) in matrix.0.iter().enumerate() {
        for (j, (other, value)) in row.iter().enumerate() {
            if j <= i {
                continue;
            }
            if let (Some(name), Some(r)) = (names.get(i), value)
                && r.abs() > threshold
            {
                alerts.push(format!("{name} is highly overall correlated with {other}"));
            }
        }
    }
}

/// Rows identical to an earlier row.
fn count_duplicate_rows(df: &DataFrame) -> Result<u64> {
    let distinct = df
        .unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
        .height();
    let duplicates = df.height() - distinct;
    debug!(duplicates, "counted duplicate rows");
    Ok(duplicates as u64)
}

// ============================================================================
// Analytics endpoint payloads
// ============================================================================

/// Dataset overview as served by the dataset-info endpoint.
pub fn dataset_info(df: &DataFrame) -> DatasetInfo {
    let columns = df.get_columns();
    DatasetInfo {
        rows: df.height() as u64,
        columns: df.width() as u64,
        features: columns.iter().map(|c| c.name().to_string()).collect(),
        missing_values: columns
            .iter()
            .map(|c| (c.name().to_string(), c.null_count() as u64))
            .collect(),
        dtypes: columns
            .iter()
            .map(|c| (c.name().to_string(), c.dtype().to_string()))
            .collect(),
        memory_usage: format!("{:.2} KB", df.estimated_size() as f64 / 1024.0),
        file_size: None,
        last_modified: None,
    }
}

fn numeric_column<'a>(df: &'a DataFrame, feature: &str) -> Result<&'a Column> {
    let column = df
        .column(feature)
        .map_err(|_| EdaError::FeatureNotFound(feature.to_string()))?;
    if !is_numeric(column.dtype()) {
        return Err(EdaError::InvalidConfig(format!(
            "feature '{feature}' is not numeric"
        )));
    }
    Ok(column)
}

/// Descriptive statistics of one numeric feature.
pub fn feature_statistics(df: &DataFrame, feature: &str) -> Result<FeatureStatistics> {
    let values = column_f64(numeric_column(df, feature)?)?;
    Ok(FeatureStatistics {
        feature: feature.to_string(),
        count: values.len() as u64,
        stats: numeric_stats(&values),
    })
}

/// Histogram payload of one numeric feature.
pub fn distribution(df: &DataFrame, feature: &str, bins: usize) -> Result<Distribution> {
    if bins == 0 {
        return Err(EdaError::InvalidConfig("bins must be positive".to_string()));
    }
    let values = column_f64(numeric_column(df, feature)?)?;
    if values.is_empty() {
        return Err(EdaError::EmptyData(format!("feature '{feature}' has no values")));
    }
    let histogram = stats::histogram(&values, bins);
    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);
    Ok(Distribution {
        feature: feature.to_string(),
        bins: histogram.bin_edges,
        counts: histogram.counts,
        total: values.len() as u64,
        mean: stats::mean(&values),
        median: stats::quantile(&sorted, 0.5),
        std: stats::std_dev(&values),
    })
}

/// Dense Pearson matrix over all numeric features.
pub fn correlation(df: &DataFrame) -> Result<CorrelationResponse> {
    let numeric: Vec<(String, Vec<Option<f64>>)> = df
        .get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()))
        .map(|c| Ok((c.name().to_string(), column_cells(c)?)))
        .collect::<Result<_>>()?;
    let rows = correlation_rows(&numeric, CorrelationMethod::Pearson);
    Ok(CorrelationResponse {
        features: numeric.into_iter().map(|(name, _)| name).collect(),
        matrix: rows
            .0
            .iter()
            .map(|row| row.values().copied().collect())
            .collect(),
    })
}
