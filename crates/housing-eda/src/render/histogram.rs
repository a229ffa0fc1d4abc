//! Histogram bins and the fixed reference lines drawn over them.

use crate::defect::Defect;
use crate::report::{Histogram, NumericStats};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const MEAN_COLOR: &str = "#ef4444";
pub const MEDIAN_COLOR: &str = "#22c55e";
pub const QUARTILE_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Left edge of the bin.
    pub x: f64,
    /// `"{left}-{right}"` with two decimals.
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistogramBinding {
    pub bins: Vec<HistogramBin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defect: Option<Defect>,
}

/// Pair counts with their bin edges.
///
/// Produces `min(counts.len(), bin_edges.len() - 1)` bins. When the lengths
/// disagree the output is truncated and the mismatch is reported.
pub fn bind_histogram(histogram: &Histogram) -> HistogramBinding {
    let (counts, edges) = (&histogram.counts, &histogram.bin_edges);
    let n_bins = counts.len().min(edges.len().saturating_sub(1));

    let defect = (edges.len() != counts.len() + 1).then(|| {
        warn!(
            counts = counts.len(),
            bin_edges = edges.len(),
            "histogram bin edges do not match counts, truncating"
        );
        Defect::HistogramLengthMismatch {
            counts: counts.len(),
            bin_edges: edges.len(),
        }
    });

    let bins = (0..n_bins)
        .map(|i| HistogramBin {
            x: edges[i],
            label: format!("{:.2}-{:.2}", edges[i], edges[i + 1]),
            count: counts[i],
        })
        .collect();

    HistogramBinding { bins, defect }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceStat {
    Mean,
    Median,
    Q1,
    Q3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

impl ReferenceStat {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Mean => MEAN_COLOR,
            Self::Median => MEDIAN_COLOR,
            Self::Q1 | Self::Q3 => QUARTILE_COLOR,
        }
    }

    pub fn style(&self) -> LineStyle {
        match self {
            Self::Mean | Self::Median => LineStyle::Solid,
            Self::Q1 | Self::Q3 => LineStyle::Dashed,
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Self::Mean => "Media",
            Self::Median => "Mediana",
            Self::Q1 => "Q1",
            Self::Q3 => "Q3",
        }
    }
}

/// A vertical marker on a histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub stat: ReferenceStat,
    /// Position, rounded to two decimals.
    pub value: f64,
    pub label: String,
    pub color: String,
    pub style: LineStyle,
}

impl ReferenceLine {
    pub fn new(stat: ReferenceStat, value: f64) -> Self {
        Self {
            stat,
            value: round2(value),
            label: format!("{}: {:.2}", stat.prefix(), value),
            color: stat.color().to_string(),
            style: stat.style(),
        }
    }
}

/// Mean, median and quartile lines, skipping statistics the report lacks.
pub fn reference_lines(stats: &NumericStats) -> Vec<ReferenceLine> {
    [
        (ReferenceStat::Mean, stats.mean),
        (ReferenceStat::Median, stats.p50),
        (ReferenceStat::Q1, stats.p25),
        (ReferenceStat::Q3, stats.p75),
    ]
    .into_iter()
    .filter_map(|(stat, value)| {
        value
            .filter(|v| v.is_finite())
            .map(|v| ReferenceLine::new(stat, v))
    })
    .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bind_histogram() {
        let binding = bind_histogram(&Histogram {
            counts: vec![3, 0, 7],
            bin_edges: vec![0.0, 2.5, 5.0, 7.5],
        });
        assert_eq!(binding.defect, None);
        assert_eq!(
            binding.bins,
            vec![
                HistogramBin {
                    x: 0.0,
                    label: "0.00-2.50".to_string(),
                    count: 3
                },
                HistogramBin {
                    x: 2.5,
                    label: "2.50-5.00".to_string(),
                    count: 0
                },
                HistogramBin {
                    x: 5.0,
                    label: "5.00-7.50".to_string(),
                    count: 7
                },
            ]
        );
    }

    #[test]
    fn test_bind_histogram_truncates_on_mismatch() {
        let too_few_edges = bind_histogram(&Histogram {
            counts: vec![1, 2, 3],
            bin_edges: vec![0.0, 1.0, 2.0],
        });
        assert_eq!(too_few_edges.bins.len(), 2);
        assert_eq!(
            too_few_edges.defect,
            Some(Defect::HistogramLengthMismatch {
                counts: 3,
                bin_edges: 3
            })
        );

        let too_many_edges = bind_histogram(&Histogram {
            counts: vec![1],
            bin_edges: vec![0.0, 1.0, 2.0, 3.0],
        });
        assert_eq!(too_many_edges.bins.len(), 1);
        assert!(too_many_edges.defect.is_some());
    }

    #[test]
    fn test_bind_empty_histogram() {
        let binding = bind_histogram(&Histogram::default());
        assert!(binding.bins.is_empty());
        assert!(binding.defect.is_some());
    }

    #[test]
    fn test_reference_lines() {
        let lines = reference_lines(&NumericStats {
            mean: Some(3.613524),
            p25: Some(0.082045),
            p50: Some(0.25651),
            p75: Some(3.677083),
            ..Default::default()
        });

        let labels: Vec<&str> = lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Media: 3.61", "Mediana: 0.26", "Q1: 0.08", "Q3: 3.68"]);
        assert_eq!(lines[0].value, 3.61);
        assert_eq!(lines[0].color, MEAN_COLOR);
        assert_eq!(lines[1].color, MEDIAN_COLOR);
        assert_eq!(lines[2].style, LineStyle::Dashed);
        assert_eq!(lines[3].color, QUARTILE_COLOR);
    }

    #[test]
    fn test_reference_lines_skip_missing() {
        let lines = reference_lines(&NumericStats {
            mean: Some(1.0),
            p50: Some(f64::NAN),
            ..Default::default()
        });
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].stat, ReferenceStat::Mean);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_bin_count_is_min_of_lengths(
                counts in proptest::collection::vec(0u64..1000, 0..40),
                edges in proptest::collection::vec(-1e6f64..1e6, 0..40),
            ) {
                let binding = bind_histogram(&Histogram {
                    counts: counts.clone(),
                    bin_edges: edges.clone(),
                });
                let expected = counts.len().min(edges.len().saturating_sub(1));
                prop_assert_eq!(binding.bins.len(), expected);
                prop_assert_eq!(binding.defect.is_none(), edges.len() == counts.len() + 1);
            }
        }
    }
}
