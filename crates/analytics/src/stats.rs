//! Descriptive statistics over raw multipliers.
//!
//! Dispersion uses population moments (divide by `n`). Skewness and kurtosis use the
//! sample-adjusted estimators (G1 and excess G2), matching common data-analysis tooling.

use crate::error::AnalyticsError;
use configuration::MAX_HISTOGRAM_BINS;
use serde::{Deserialize, Serialize};

/// Percentage of rounds whose multiplier strictly exceeds 1.0. Zero for an empty history.
pub fn win_rate(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let wins = values.iter().filter(|&&v| v > 1.0).count();
    (wins as f64 / values.len() as f64) * 100.0
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

pub fn range(values: &[f64]) -> f64 {
    max(values) - min(values)
}

/// Population variance. Zero for fewer than two points.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    central_sum(values, 2) / values.len() as f64
}

/// Population standard deviation, the sole risk signal. Zero for fewer than two points.
pub fn volatility(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Adjusted Fisher-Pearson skewness (G1). Zero below three points or without spread.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }
    let m2 = central_sum(values, 2);
    if m2 <= f64::EPSILON {
        return 0.0;
    }
    let m3 = central_sum(values, 3);
    let n = n as f64;
    (n * (n - 1.0).sqrt() / (n - 2.0)) * (m3 / m2.powf(1.5))
}

/// Adjusted excess kurtosis (G2). Zero below four points or without spread.
pub fn kurtosis(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 4 {
        return 0.0;
    }
    let m2 = central_sum(values, 2);
    if m2 <= f64::EPSILON {
        return 0.0;
    }
    let m4 = central_sum(values, 4);
    let n = n as f64;
    let numerator = n * (n + 1.0) * (n - 1.0) * m4;
    let denominator = (n - 2.0) * (n - 3.0) * m2 * m2;
    let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    numerator / denominator - adjustment
}

/// Sum of `(x - mean)^power` over all points.
fn central_sum(values: &[f64], power: i32) -> f64 {
    let mean = mean(values);
    values.iter().map(|v| (v - mean).powi(power)).sum()
}

/// One bar of the distribution view: `[lower, upper)` and how many points fell into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Buckets the values into `bins` equal-width bins spanning `[min, max]`.
///
/// The last bin is closed so the maximum is counted. When every value is equal the
/// span is widened to `value ± 0.5`. `bins` must lie in `1..=MAX_HISTOGRAM_BINS`.
pub fn histogram(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>, AnalyticsError> {
    if bins == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "histogram needs at least one bin".to_string(),
        ));
    }
    if bins > MAX_HISTOGRAM_BINS {
        return Err(AnalyticsError::InvalidParameter(format!(
            "histogram supports at most {MAX_HISTOGRAM_BINS} bins, got {bins}"
        )));
    }
    if values.is_empty() {
        return Err(AnalyticsError::NotEnoughData(
            "histogram of an empty history".to_string(),
        ));
    }

    let (mut low, mut high) = (min(values), max(values));
    if high - low <= f64::EPSILON {
        low -= 0.5;
        high += 0.5;
    }
    let width = (high - low) / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in values {
        let index = ((value - low) / width).floor() as usize;
        counts[index.min(bins - 1)] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: low + width * i as f64,
            upper: low + width * (i + 1) as f64,
            count,
        })
        .collect())
}
