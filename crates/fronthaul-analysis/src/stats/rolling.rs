//! Rolling median / MAD baseline.
//!
//! A window covers the last `window` positions ending at the current one.
//! Non-finite inputs occupy a position but do not count toward
//! `min_periods`; the output is NaN until `min_periods` finite values are
//! present in the window.

use super::median_of_sorted;

/// Rolling median over `window` positions, NaN until `min_periods` finite
/// samples are present.
pub fn rolling_median(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    let window = window.max(1);
    let min_periods = min_periods.max(1);
    let mut sorted: Vec<f64> = Vec::with_capacity(window);
    let mut out = Vec::with_capacity(values.len());

    for (i, &v) in values.iter().enumerate() {
        if v.is_finite() {
            let pos = sorted.partition_point(|x| x.total_cmp(&v).is_lt());
            sorted.insert(pos, v);
        }
        if i >= window {
            let old = values[i - window];
            if old.is_finite() {
                let pos = sorted.partition_point(|x| x.total_cmp(&old).is_lt());
                sorted.remove(pos);
            }
        }
        out.push(if sorted.len() >= min_periods {
            median_of_sorted(&sorted)
        } else {
            f64::NAN
        });
    }
    out
}

/// Rolling median absolute deviation from `baseline`.
///
/// Deviations at positions where the baseline is undefined are themselves
/// undefined and do not count toward `min_periods`.
pub fn rolling_mad(
    values: &[f64],
    baseline: &[f64],
    window: usize,
    min_periods: usize,
) -> Vec<f64> {
    let deviations: Vec<f64> = values
        .iter()
        .zip(baseline)
        .map(|(x, m)| if m.is_finite() { (x - m).abs() } else { f64::NAN })
        .collect();
    rolling_median(&deviations, window, min_periods)
}

/// Rolling median and MAD computed together.
#[derive(Debug, Clone)]
pub struct RollingBaseline {
    pub median: Vec<f64>,
    pub mad: Vec<f64>,
}

impl RollingBaseline {
    pub fn compute(values: &[f64], window: usize, min_periods: usize) -> Self {
        let median = rolling_median(values, window, min_periods);
        let mad = rolling_mad(values, &median, window, min_periods);
        Self { median, mad }
    }

    /// Whether both median and MAD are defined at `idx`.
    pub fn is_defined(&self, idx: usize) -> bool {
        self.median[idx].is_finite() && self.mad[idx].is_finite()
    }

    /// Robust z-score `(x - median) / (MAD + epsilon)`; NaN where undefined.
    pub fn robust_z(&self, values: &[f64], epsilon: f64) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                if self.is_defined(i) {
                    (x - self.median[i]) / (self.mad[i] + epsilon)
                } else {
                    f64::NAN
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_until_min_periods() {
        let m = rolling_median(&[1.0, 2.0, 3.0, 4.0], 3, 2);
        assert!(m[0].is_nan());
        assert_eq!(m[1], 1.5);
        assert_eq!(m[2], 2.0);
        assert_eq!(m[3], 3.0);
    }

    #[test]
    fn window_drops_old_values() {
        let m = rolling_median(&[100.0, 1.0, 1.0, 1.0], 2, 1);
        assert_eq!(m, vec![100.0, 50.5, 1.0, 1.0]);
    }

    #[test]
    fn nan_inputs_do_not_count() {
        let m = rolling_median(&[f64::NAN, 2.0, f64::NAN, 4.0], 4, 2);
        assert!(m[1].is_nan());
        assert!(m[2].is_nan());
        assert_eq!(m[3], 3.0);
    }

    #[test]
    fn mad_lags_the_median() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = RollingBaseline::compute(&values, 5, 2);
        // median defined from index 1, deviations from index 1, MAD from index 2
        assert!(b.median[1].is_finite());
        assert!(b.mad[1].is_nan());
        assert!(b.mad[2].is_finite());
        assert!(!b.is_defined(1));
        assert!(b.is_defined(2));
    }

    #[test]
    fn robust_z_is_zero_on_flat_series() {
        let values = [5.0; 10];
        let b = RollingBaseline::compute(&values, 5, 2);
        let z = b.robust_z(&values, 1e-6);
        assert!(z[0].is_nan());
        assert_eq!(z[9], 0.0);
    }
}
