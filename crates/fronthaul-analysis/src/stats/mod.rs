//! Shared statistics helpers.

pub mod correlation;
pub mod rolling;

pub use correlation::{cosine, normalize, pearson};
pub use rolling::{rolling_mad, rolling_median, RollingBaseline};

use statrs::statistics::Statistics;

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Population standard deviation; NaN for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    values.iter().population_std_dev()
}

/// Median of the finite values; NaN if there are none.
pub fn median(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);
    median_of_sorted(&sorted)
}

pub(crate) fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        f64::NAN
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Replace NaN with zero.
pub fn nan_to_zero(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}
