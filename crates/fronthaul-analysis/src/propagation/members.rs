//! Lag analysis between member cells inside one group.

use fronthaul_core::types::CellSeries;

use super::events::pair_lag;
use super::types::{Direction, MemberLag, PropagationParams};
use crate::topology::TopologyGroup;

/// Lagged correlations between every pair of members of each group with
/// at least two members. Pairs follow ascending cell id; a positive lag
/// makes the lower cell the source.
pub fn member_lags(
    groups: &[TopologyGroup],
    indicators: &[CellSeries],
    params: &PropagationParams,
) -> Vec<MemberLag> {
    let mut out = Vec::new();
    for group in groups.iter().filter(|g| g.cells.len() >= 2) {
        let mut members: Vec<&CellSeries> = group.members(indicators).collect();
        members.sort_by_key(|s| s.cell_id);
        for (i, first) in members.iter().enumerate() {
            for second in &members[i + 1..] {
                let (a, b) = first.align(second);
                let Some(est) = pair_lag(&a, &b, params) else {
                    continue;
                };
                if est.correlation.abs() < params.min_correlation {
                    continue;
                }
                let direction = Direction::from_lag(est.lag);
                let (source_cell, target_cell) = match direction {
                    Direction::Upstream => (second.cell_id, first.cell_id),
                    Direction::Downstream | Direction::Simultaneous => {
                        (first.cell_id, second.cell_id)
                    }
                };
                out.push(MemberLag {
                    group_id: group.group_id,
                    source_cell,
                    target_cell,
                    lag_slots: est.lag,
                    delay_ms: est.lag.unsigned_abs() as f64 * params.slot_duration_ms,
                    correlation: est.correlation,
                    direction,
                });
            }
        }
    }
    out
}
