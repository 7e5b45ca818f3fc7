//! Lagged cross-correlation.
//!
//! `xcorr(a, b, lag)` is the Pearson correlation of `a[t]` with
//! `b[t + lag]`, so a positive best lag means `b` follows `a`. By
//! construction `xcorr(a, b, L) == xcorr(b, a, -L)`.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::stats;

/// Best lag and the correlation at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagEstimate {
    pub lag: i64,
    pub correlation: f64,
    /// Number of overlapping samples at `lag`.
    pub overlap: usize,
}

/// Correlation of `a[t]` with `b[t + lag]`; 0 when undefined.
pub fn xcorr(a: &[f64], b: &[f64], lag: i64) -> f64 {
    let n = a.len().min(b.len());
    let shift = lag.unsigned_abs() as usize;
    if shift >= n {
        return 0.0;
    }
    let r = if lag >= 0 {
        stats::pearson(&a[..n - shift], &b[shift..n])
    } else {
        stats::pearson(&a[shift..n], &b[..n - shift])
    };
    stats::nan_to_zero(r)
}

/// Lag in `[-L', L']`, `L' = min(max_lag, n / 2)`, with the largest
/// |correlation|. The first maximum in ascending lag order wins.
pub fn best_lag(a: &[f64], b: &[f64], max_lag: usize) -> LagEstimate {
    let n = a.len().min(b.len());
    let bound = max_lag.min(n / 2) as i64;
    let mut best = LagEstimate {
        lag: -bound,
        correlation: xcorr(a, b, -bound),
        overlap: n - bound as usize,
    };
    for lag in (-bound + 1)..=bound {
        let c = xcorr(a, b, lag);
        if c.abs() > best.correlation.abs() {
            best = LagEstimate {
                lag,
                correlation: c,
                overlap: n - lag.unsigned_abs() as usize,
            };
        }
    }
    best
}

/// Two-sided p-value of a Pearson correlation over `n` samples
/// (Student-t with `n - 2` degrees of freedom).
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n <= 2 || !r.is_finite() {
        return 1.0;
    }
    let r = r.clamp(-1.0, 1.0);
    if (1.0 - r.abs()) <= f64::EPSILON {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulse(n: usize, at: &[usize]) -> Vec<f64> {
        let mut v = vec![0.0; n];
        for &i in at {
            v[i] = 1.0;
        }
        v
    }

    #[test]
    fn positive_lag_when_second_follows_first() {
        let a = pulse(60, &[5, 17, 30, 41]);
        let b = pulse(60, &[8, 20, 33, 44]);
        let est = best_lag(&a, &b, 10);
        assert_eq!(est.lag, 3);
        assert!((est.correlation - 1.0).abs() < 1e-9);
        assert_eq!(est.overlap, 57);
    }

    #[test]
    fn swapping_sides_negates_the_lag() {
        let a = pulse(60, &[5, 17, 30, 41]);
        let b = pulse(60, &[8, 20, 33, 44]);
        assert_eq!(best_lag(&b, &a, 10).lag, -3);
        for lag in -10..=10 {
            assert_eq!(xcorr(&a, &b, lag), xcorr(&b, &a, -lag));
        }
    }

    #[test]
    fn lag_range_is_bounded_by_half_the_length() {
        let a = pulse(10, &[0]);
        let b = pulse(10, &[9]);
        // A 9-slot shift is out of range for n = 10.
        assert!(best_lag(&a, &b, 50).lag.abs() <= 5);
    }

    #[test]
    fn constant_signals_correlate_to_zero() {
        let est = best_lag(&[1.0; 20], &[0.0; 20], 5);
        assert_eq!(est.correlation, 0.0);
        assert_eq!(est.lag, -5);
    }

    #[test]
    fn p_value_shrinks_with_stronger_correlation() {
        let weak = correlation_p_value(0.1, 100);
        let strong = correlation_p_value(0.8, 100);
        assert!(strong < weak);
        assert!(weak > 0.05);
        assert!(strong < 1e-6);
        assert_eq!(correlation_p_value(0.5, 2), 1.0);
        assert_eq!(correlation_p_value(1.0, 50), 0.0);
    }
}
