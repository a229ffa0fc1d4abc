//! Descriptive statistics over plain `f64` slices.

use crate::report::Histogram;

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (`n - 1` denominator).
pub(crate) fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Linear-interpolated quantile of an ascending slice.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

fn central_moment(values: &[f64], mean: f64, order: i32) -> f64 {
    values.iter().map(|v| (v - mean).powi(order)).sum::<f64>() / values.len() as f64
}

/// Moment skewness `m3 / m2^1.5`. Zero for constant data.
pub(crate) fn skewness(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let m2 = central_moment(values, mean, 2);
    if m2 == 0.0 {
        return Some(0.0);
    }
    Some(central_moment(values, mean, 3) / m2.powf(1.5))
}

/// Moment kurtosis `m4 / m2^2`, where a Gaussian scores 3.
pub(crate) fn kurtosis(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let m2 = central_moment(values, mean, 2);
    if m2 == 0.0 {
        return None;
    }
    Some(central_moment(values, mean, 4) / (m2 * m2))
}

/// Equal-width histogram over `[min, max]`; the last bin is closed.
///
/// Constant data gets the unit range `[v - 0.5, v + 0.5]`.
pub(crate) fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Histogram::default();
    };
    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;

    let bin_edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0u64; bins];
    for v in values {
        let index = (((v - lo) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }
    Histogram { counts, bin_edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(mean(&values), Some(3.0));
        assert!((std_dev(&values).unwrap() - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(std_dev(&[5.0]), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&sorted, 1.0), Some(4.0));
    }

    #[test]
    fn test_shape_moments() {
        let symmetric = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(skewness(&symmetric).unwrap().abs() < 1e-12);
        assert!((kurtosis(&symmetric).unwrap() - 1.7).abs() < 1e-12);

        let right_tail = [1.0, 1.0, 1.0, 1.0, 10.0];
        assert!(skewness(&right_tail).unwrap() > 1.0);
        assert_eq!(kurtosis(&[2.0, 2.0]), None);
    }

    #[test]
    fn test_histogram() {
        let hist = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(hist.bin_edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(hist.counts, vec![1, 1, 1, 2]);

        let constant = histogram(&[7.0, 7.0], 3);
        assert_eq!(constant.counts.iter().sum::<u64>(), 2);
        assert_eq!(constant.bin_edges.len(), 4);
        assert!(histogram(&[], 10).counts.is_empty());
    }
}
