//! Slot-indexed per-cell signal.

use serde::Serialize;

use super::identifiers::{CellId, SlotId};
use crate::errors::InputError;

/// One cell's signal, ordered by strictly increasing slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSeries {
    pub cell_id: CellId,
    slots: Vec<SlotId>,
    values: Vec<f64>,
}

impl CellSeries {
    /// Build a series from `(slot, value)` samples in any order.
    /// Duplicate slots are rejected.
    pub fn new(cell_id: CellId, mut samples: Vec<(SlotId, f64)>) -> Result<Self, InputError> {
        samples.sort_by_key(|(slot, _)| *slot);
        if let Some(w) = samples.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(InputError::DuplicateSlot {
                cell_id: cell_id.value(),
                slot_id: w[0].0,
            });
        }
        let (slots, values) = samples.into_iter().unzip();
        Ok(Self {
            cell_id,
            slots,
            values,
        })
    }

    /// Build a series over slots `0..values.len()`.
    pub fn from_values(cell_id: CellId, values: Vec<f64>) -> Self {
        let slots = (0..values.len() as SlotId).collect();
        Self {
            cell_id,
            slots,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn slots(&self) -> &[SlotId] {
        &self.slots
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, f64)> + '_ {
        self.slots.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `slot`, if the series has one.
    pub fn get(&self, slot: SlotId) -> Option<f64> {
        self.slots
            .binary_search(&slot)
            .ok()
            .map(|idx| self.values[idx])
    }

    /// Replace every value through `f`, keeping the slot index.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            cell_id: self.cell_id,
            slots: self.slots.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Pair each value with a parallel derived value and drop slots where
    /// the derived value is not finite.
    pub fn with_values(&self, derived: &[f64]) -> Self {
        let (slots, values) = self
            .slots
            .iter()
            .zip(derived)
            .filter(|(_, v)| v.is_finite())
            .map(|(&s, &v)| (s, v))
            .unzip();
        Self {
            cell_id: self.cell_id,
            slots,
            values,
        }
    }

    /// Align two series on the intersection of their slots.
    /// Non-overlapping slots are dropped.
    pub fn align(&self, other: &CellSeries) -> (Vec<f64>, Vec<f64>) {
        align_samples((&self.slots, &self.values), (&other.slots, &other.values))
    }
}

/// Merge two slot-ordered sample sets on their common slots.
pub fn align_samples(
    (left_slots, left_values): (&[SlotId], &[f64]),
    (right_slots, right_values): (&[SlotId], &[f64]),
) -> (Vec<f64>, Vec<f64>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < left_slots.len() && j < right_slots.len() {
        match left_slots[i].cmp(&right_slots[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                left.push(left_values[i]);
                right.push(right_values[j]);
                i += 1;
                j += 1;
            }
        }
    }
    (left, right)
}
