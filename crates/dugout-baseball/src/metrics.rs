// Fit metrics for backtests: z-normalization, Pearson correlation, MAE, RMSE.

/// Mean and standard deviation of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and population standard deviation (N denominator).
///
/// Returns zeros for an empty slice.
pub fn series_stats(values: &[f64]) -> SeriesStats {
    if values.is_empty() {
        return SeriesStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    SeriesStats {
        mean,
        stdev: variance.sqrt(),
    }
}

pub fn mean(values: &[f64]) -> f64 {
    series_stats(values).mean
}

pub fn std_dev(values: &[f64]) -> f64 {
    series_stats(values).stdev
}

/// Standardize to zero mean and unit variance.
///
/// A constant series has no spread to standardize by, so it is returned
/// unchanged.
pub fn z_normalize(values: &[f64]) -> Vec<f64> {
    let stats = series_stats(values);
    if stats.stdev < STDEV_EPSILON {
        return values.to_vec();
    }
    values.iter().map(|v| (v - stats.mean) / stats.stdev).collect()
}

/// Pearson correlation coefficient.
///
/// Returns 0.0 when there are fewer than two pairs, the lengths differ, or
/// either series has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx < STDEV_EPSILON * STDEV_EPSILON || vy < STDEV_EPSILON * STDEV_EPSILON {
        return 0.0;
    }
    let r = cov / (vx.sqrt() * vy.sqrt());
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Mean absolute error. Empty or mismatched input gives 0.0.
pub fn mae(predicted: &[f64], actual: &[f64]) -> f64 {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return 0.0;
    }
    predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).abs())
        .sum::<f64>()
        / predicted.len() as f64
}

/// Root mean squared error. Empty or mismatched input gives 0.0.
pub fn rmse(predicted: &[f64], actual: &[f64]) -> f64 {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return 0.0;
    }
    let mse = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).powi(2))
        .sum::<f64>()
        / predicted.len() as f64;
    mse.sqrt()
}
