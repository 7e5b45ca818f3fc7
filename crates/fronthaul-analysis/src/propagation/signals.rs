//! Group-level signals: per-slot mean of member indicators.

use fronthaul_core::errors::AnalysisError;
use fronthaul_core::types::{align_samples, BTreeMap, CellSeries, GroupId, SlotId};

use crate::topology::TopologyGroup;

/// Aggregate signal of one group, ordered by slot.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSignal {
    pub group_id: GroupId,
    pub slots: Vec<SlotId>,
    pub values: Vec<f64>,
}

impl GroupSignal {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values of both signals on their common slots.
    pub fn align(&self, other: &GroupSignal) -> (Vec<f64>, Vec<f64>) {
        align_samples((&self.slots, &self.values), (&other.slots, &other.values))
    }
}

/// One signal per group, in group order. At each slot the value is the
/// mean over the members that have an indicator there.
///
/// A group none of whose members has an indicator series is an internal
/// inconsistency between topology and indicators.
pub fn group_signals(
    groups: &[TopologyGroup],
    indicators: &[CellSeries],
) -> Result<Vec<GroupSignal>, AnalysisError> {
    groups
        .iter()
        .map(|group| {
            let mut sums: BTreeMap<SlotId, (f64, usize)> = BTreeMap::new();
            let mut found = false;
            for member in group.members(indicators) {
                found = true;
                for (slot, value) in member.iter() {
                    let entry = sums.entry(slot).or_insert((0.0, 0));
                    entry.0 += value;
                    entry.1 += 1;
                }
            }
            if !found {
                return Err(AnalysisError::EmptyGroup {
                    group_id: group.group_id.to_string(),
                });
            }
            let (slots, values) = sums
                .into_iter()
                .map(|(slot, (sum, count))| (slot, sum / count as f64))
                .unzip();
            Ok(GroupSignal {
                group_id: group.group_id,
                slots,
                values,
            })
        })
        .collect()
}
