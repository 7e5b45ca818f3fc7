//! Leader heuristic: who is active first when several members are.

use fronthaul_core::types::{BTreeMap, CellSeries, SlotId};

use super::types::{GroupLeader, LeadCount};
use crate::topology::TopologyGroup;

/// For each group, pivot member indicators over the union of their slots
/// (missing counts as inactive) with members in ascending cell id order.
/// In every slot with two or more active members the first active member
/// is credited. The leader has the most credits, ties going to the lower
/// cell id; without any such slot there is no leader.
pub fn group_leaders(groups: &[TopologyGroup], indicators: &[CellSeries]) -> Vec<GroupLeader> {
    groups
        .iter()
        .map(|group| {
            let mut members: Vec<&CellSeries> = group.members(indicators).collect();
            members.sort_by_key(|s| s.cell_id);

            let mut active: BTreeMap<SlotId, Vec<usize>> = BTreeMap::new();
            for (m, series) in members.iter().enumerate() {
                for (slot, value) in series.iter() {
                    let entry = active.entry(slot).or_default();
                    if value > 0.0 {
                        entry.push(m);
                    }
                }
            }

            let mut counts = vec![0usize; members.len()];
            let mut simultaneous_slots = 0;
            for slot_members in active.values() {
                if slot_members.len() >= 2 {
                    simultaneous_slots += 1;
                    // Members were pushed in ascending order.
                    counts[slot_members[0]] += 1;
                }
            }

            let leader = if simultaneous_slots == 0 {
                None
            } else {
                let mut best = 0;
                for (m, &c) in counts.iter().enumerate() {
                    if c > counts[best] {
                        best = m;
                    }
                }
                Some(members[best].cell_id)
            };

            GroupLeader {
                group_id: group.group_id,
                leader,
                lead_counts: members
                    .iter()
                    .zip(&counts)
                    .map(|(s, &count)| LeadCount {
                        cell_id: s.cell_id,
                        count,
                    })
                    .collect(),
                simultaneous_slots,
            }
        })
        .collect()
}
