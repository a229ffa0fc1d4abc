//! Per-feature drift with the two-sample Kolmogorov-Smirnov test.

use super::loader::{column_f64, is_numeric};
use crate::classify::DriftSeverity;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::external::{FeatureDrift, FeatureDriftReport};
use indexmap::IndexMap;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Largest `n * m` for which the p-value is computed exactly.
const EXACT_MAX_CELLS: usize = 10_000_000;

/// Two-sample KS statistic and two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsResult {
    pub statistic: f64,
    pub p_value: f64,
}

/// Two-sample KS test. `None` if either sample has no finite value.
///
/// NaN and infinities are dropped first. The statistic is the largest
/// distance between the two empirical CDFs. The p-value is exact for
/// `n * m` up to [`EXACT_MAX_CELLS`] and otherwise uses the Kolmogorov
/// limiting distribution with the Stephens correction.
pub fn ks_two_sample(a: &[f64], b: &[f64]) -> Option<KsResult> {
    let mut a: Vec<f64> = a.iter().copied().filter(|v| v.is_finite()).collect();
    let mut b: Vec<f64> = b.iter().copied().filter(|v| v.is_finite()).collect();
    if a.is_empty() || b.is_empty() {
        return None;
    }
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (n, m) = (a.len(), b.len());
    let (mut i, mut j) = (0, 0);
    let mut statistic: f64 = 0.0;
    while i < n && j < m {
        let x = a[i].min(b[j]);
        while i < n && a[i] <= x {
            i += 1;
        }
        while j < m && b[j] <= x {
            j += 1;
        }
        let distance = (i as f64 / n as f64 - j as f64 / m as f64).abs();
        statistic = statistic.max(distance);
    }

    let p_value = if n.saturating_mul(m) <= EXACT_MAX_CELLS {
        exact_p_value(n, m, statistic)
    } else {
        let effective = ((n * m) as f64 / (n + m) as f64).sqrt();
        kolmogorov_survival((effective + 0.12 + 0.11 / effective) * statistic)
    };
    Some(KsResult { statistic, p_value })
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Exact `P(D >= d)` under the null, by lattice-path counting.
///
/// Every monotone path from `(0, 0)` to `(n, m)` is equally likely. A point
/// `(i, j)` lies outside the band when `|i/n - j/m| >= d`; on the common
/// denominator `lcm(n, m)` that test is done in integers. `outside[j]` holds
/// the share of paths to `(i, j)` that have left the band, so only one row
/// is kept.
fn exact_p_value(n: usize, m: usize, statistic: f64) -> f64 {
    let lcm = n / gcd(n, m) * m;
    let bound = (statistic * lcm as f64).round() as i64;
    if bound <= 0 {
        return 1.0;
    }
    let (step_i, step_j) = ((lcm / n) as i64, (lcm / m) as i64);

    let mut outside = vec![0.0_f64; m + 1];
    for i in 0..=n {
        for j in 0..=m {
            if (i as i64 * step_i - j as i64 * step_j).abs() >= bound {
                outside[j] = 1.0;
            } else if i + j > 0 {
                let from_above = if i > 0 { i as f64 * outside[j] } else { 0.0 };
                let from_left = if j > 0 { j as f64 * outside[j - 1] } else { 0.0 };
                outside[j] = (from_above + from_left) / (i + j) as f64;
            }
        }
    }
    outside[m].clamp(0.0, 1.0)
}

/// `Q(λ) = 2 Σ (-1)^(k-1) exp(-2 k² λ²)`, clamped to `[0, 1]`.
fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda < 1e-3 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut sign = 1.0;
    for k in 1..=100 {
        let k = k as f64;
        let term = (-2.0 * k * k * lambda * lambda).exp();
        sum += sign * term;
        if term < 1e-12 {
            break;
        }
        sign = -sign;
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

/// Test each current sample against the same-named baseline column.
///
/// Features missing from the baseline, non-numeric, or empty on either side
/// are skipped. Severity uses the configured cut points; drift means
/// `p < drift_significance`.
pub fn detect_feature_drift(
    baseline: &DataFrame,
    current: &IndexMap<String, Vec<f64>>,
    config: &DashboardConfig,
) -> Result<FeatureDriftReport> {
    let mut features = IndexMap::new();

    for (feature, values) in current.iter() {
        let Ok(column) = baseline.column(feature) else {
            debug!(feature, "feature not in baseline, skipping");
            continue;
        };
        if !is_numeric(column.dtype()) {
            warn!(feature, "baseline feature is not numeric, skipping");
            continue;
        }
        let reference = column_f64(column)?;
        let Some(ks) = ks_two_sample(&reference, values) else {
            debug!(feature, "empty sample, skipping");
            continue;
        };
        features.insert(
            feature.clone(),
            FeatureDrift {
                has_drift: ks.p_value < config.drift_significance,
                p_value: ks.p_value,
                statistic: ks.statistic,
                severity: Some(DriftSeverity::classify(ks.p_value, &config.drift_thresholds)),
            },
        );
    }

    let drifted = features.values().filter(|f| f.has_drift).count();
    let drift_score = if features.is_empty() {
        0.0
    } else {
        drifted as f64 / features.len() as f64
    };
    info!(
        tested = features.len(),
        drifted, drift_score, "feature drift detected"
    );

    Ok(FeatureDriftReport {
        overall_drift: drift_score > config.overall_drift_ratio,
        drift_score,
        features,
        timestamp: Some(chrono::Utc::now().to_rfc3339()),
    })
}

/// Drift between two frames over their shared numeric columns.
pub fn detect_frame_drift(
    baseline: &DataFrame,
    current: &DataFrame,
    config: &DashboardConfig,
) -> Result<FeatureDriftReport> {
    let samples: IndexMap<String, Vec<f64>> = current
        .get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()))
        .map(|c| Ok((c.name().to_string(), column_f64(c)?)))
        .collect::<Result<_>>()?;
    detect_feature_drift(baseline, &samples, config)
}
