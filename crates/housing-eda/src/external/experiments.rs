//! Experiment-tracking runs and the run comparison table.

use indexmap::IndexMap;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A run timestamp: epoch milliseconds or an ISO 8601 string, depending on
/// how the tracking server serialized it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunTimestamp {
    Millis(i64),
    Text(String),
}

impl RunTimestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            Self::Text(raw) => DateTime::parse_from_rfc3339(raw)
                .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z"))
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                        .ok()
                        .map(|naive| naive.and_utc())
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<RunTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<RunTimestamp>,
    /// Metric name -> value. `null` when the run never logged it.
    #[serde(default)]
    pub metrics: IndexMap<String, Option<f64>>,
    #[serde(default)]
    pub params: IndexMap<String, Option<String>>,
}

impl RunSummary {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied().flatten().filter(|v| v.is_finite())
    }

    pub fn duration_secs(&self) -> Option<f64> {
        let start = self.start_time.as_ref()?.to_datetime()?;
        let end = self.end_time.as_ref()?.to_datetime()?;
        let elapsed = end - start;
        (elapsed.num_milliseconds() >= 0).then(|| elapsed.num_milliseconds() as f64 / 1000.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    LowerIsBetter,
    HigherIsBetter,
}

const ERROR_METRICS: [&str; 5] = ["rmse", "mae", "mse", "loss", "error"];

/// Error-like metrics are minimized, everything else (r2, accuracy) maximized.
pub fn metric_direction(name: &str) -> MetricDirection {
    let lower = name.to_ascii_lowercase();
    if ERROR_METRICS.iter().any(|m| lower.contains(m)) {
        MetricDirection::LowerIsBetter
    } else {
        MetricDirection::HigherIsBetter
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestRun {
    pub metric: String,
    pub run_id: String,
    pub value: f64,
    pub direction: MetricDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRow {
    pub run_id: String,
    pub status: String,
    pub duration_secs: Option<f64>,
    /// One entry per [`RunComparison::metrics`] column.
    pub values: Vec<Option<f64>>,
    /// Whether this run holds the best value of the column.
    pub best: Vec<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunComparison {
    pub metrics: Vec<String>,
    pub rows: Vec<RunRow>,
    pub best: Vec<BestRun>,
}

/// Side-by-side table of runs, metric columns in first-seen order.
///
/// Ties keep the earliest run as best.
pub fn compare_runs(runs: &[RunSummary]) -> RunComparison {
    let mut metrics: Vec<String> = Vec::new();
    for name in runs.iter().flat_map(|run| run.metrics.keys()) {
        if !metrics.iter().any(|m| m == name) {
            metrics.push(name.to_string());
        }
    }

    let best: Vec<BestRun> = metrics
        .iter()
        .filter_map(|metric| {
            let direction = metric_direction(metric);
            runs.iter()
                .filter_map(|run| run.metric(metric).map(|value| (run, value)))
                .fold(None, |best: Option<(&RunSummary, f64)>, (run, value)| match best {
                    Some((_, current)) if !improves(direction, value, current) => best,
                    _ => Some((run, value)),
                })
                .map(|(run, value)| BestRun {
                    metric: metric.clone(),
                    run_id: run.run_id.clone(),
                    value,
                    direction,
                })
        })
        .collect();

    let rows = runs
        .iter()
        .map(|run| RunRow {
            run_id: run.run_id.clone(),
            status: run.status.clone(),
            duration_secs: run.duration_secs(),
            values: metrics.iter().map(|m| run.metric(m)).collect(),
            best: metrics
                .iter()
                .map(|m| best.iter().any(|b| &b.metric == m && b.run_id == run.run_id))
                .collect(),
        })
        .collect();

    debug!(runs = runs.len(), metrics = metrics.len(), "compared runs");
    RunComparison { metrics, rows, best }
}

fn improves(direction: MetricDirection, candidate: f64, current: f64) -> bool {
    match direction {
        MetricDirection::LowerIsBetter => candidate < current,
        MetricDirection::HigherIsBetter => candidate > current,
    }
}
