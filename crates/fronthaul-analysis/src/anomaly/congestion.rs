//! Congestion indicator derived from throughput.

use fronthaul_core::types::CellSeries;

use crate::stats::rolling_median;

/// Flag slots whose throughput falls below `ratio` times the rolling
/// median over the last `window` slots (defined from the first slot).
pub fn derive_congestion(throughput: &CellSeries, window: usize, ratio: f64) -> CellSeries {
    let baseline = rolling_median(throughput.values(), window, 1);
    let flags: Vec<f64> = throughput
        .values()
        .iter()
        .zip(&baseline)
        .map(|(&x, &m)| if m.is_finite() && x < ratio * m { 1.0 } else { 0.0 })
        .collect();
    throughput.with_values(&flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fronthaul_core::types::CellId;

    #[test]
    fn collapse_below_half_the_median_is_congestion() {
        let tp = CellSeries::from_values(CellId(1), vec![100.0, 100.0, 40.0, 100.0, 60.0, 100.0]);
        let c = derive_congestion(&tp, 20, 0.5);
        assert_eq!(c.values(), &[0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(c.slots(), tp.slots());
    }
}
