//! Synthetic scenarios.

use fronthaul_core::types::{CellId, CellSeries};
use fronthaul_core::SlotRecord;

use crate::rng::SimpleRng;

/// Steady throughput level.
const BASE_THROUGHPUT: f64 = 100.0;
/// Throughput during a collapse.
const COLLAPSED_THROUGHPUT: f64 = 20.0;
/// Peak-to-peak jitter half-width on steady throughput.
const JITTER: f64 = 3.0;

/// Three cells over 1000 slots.
///
/// Cell 0 collapses for 20 slots starting at `30 + 100k`, `k = 0..10`.
/// Cell 1 repeats those collapses 5 slots later but skips every fifth one
/// (80% co-occurrence). Cell 2 collapses independently on about 5% of
/// slots. Every record carries throughput and the matching congestion flag.
pub struct SharedLinkScenario {
    pub records: Vec<SlotRecord>,
    pub leader: CellId,
    pub follower: CellId,
    pub independent: CellId,
    pub lag_slots: i64,
    pub slots: usize,
}

pub fn shared_link(seed: u64) -> SharedLinkScenario {
    const SLOTS: usize = 1000;
    const BURST_LEN: usize = 20;
    const LAG: usize = 5;

    let in_burst = |slot: usize, shift: usize, skip_every_fifth: bool| {
        (0..10).any(|k: usize| {
            let start = 30 + 100 * k + shift;
            (!skip_every_fifth || k % 5 != 4) && slot >= start && slot < start + BURST_LEN
        })
    };

    let mut rng = SimpleRng::new(seed);
    let mut records = Vec::with_capacity(3 * SLOTS);
    for slot in 0..SLOTS {
        let collapsed = [
            in_burst(slot, 0, false),
            in_burst(slot, LAG, true),
            rng.next_f64() < 0.05,
        ];
        for (cell, &down) in collapsed.iter().enumerate() {
            records.push(record(&mut rng, cell as i64, slot as i64, down));
        }
    }

    SharedLinkScenario {
        records,
        leader: CellId(0),
        follower: CellId(1),
        independent: CellId(2),
        lag_slots: LAG as i64,
        slots: SLOTS,
    }
}

fn record(rng: &mut SimpleRng, cell: i64, slot: i64, collapsed: bool) -> SlotRecord {
    let throughput = if collapsed {
        COLLAPSED_THROUGHPUT + rng.range(-JITTER, JITTER)
    } else {
        BASE_THROUGHPUT + rng.range(-JITTER, JITTER)
    };
    SlotRecord {
        slot_id: slot,
        cell_id: cell,
        throughput_slot: Some(throughput),
        loss_event: None,
        congestion_event: Some(i64::from(collapsed)),
    }
}

/// Three groups of two identical cells each. Group A (cells 10, 11)
/// congests in 6-slot bursts at irregular intervals, group B (20, 21)
/// repeats them 3 slots later, and group C (30, 31) 6 slots later but
/// skipping every fourth burst. Congestion flags only.
pub struct CascadeScenario {
    pub records: Vec<SlotRecord>,
    pub groups: [[CellId; 2]; 3],
    pub hop_lag: i64,
}

pub fn cascade(seed: u64) -> CascadeScenario {
    const SLOTS: usize = 600;
    const BURST_LEN: usize = 6;
    const HOP: usize = 3;

    let mut rng = SimpleRng::new(seed);
    let mut starts = Vec::new();
    let mut next = 10;
    while next + BURST_LEN + 2 * HOP < SLOTS {
        starts.push(next);
        next += rng.below(18, 45);
    }

    let active = |slot: usize, shift: usize, skip_fourth: bool| {
        starts.iter().enumerate().any(|(k, &s)| {
            (!skip_fourth || k % 4 != 3) && slot >= s + shift && slot < s + shift + BURST_LEN
        })
    };

    let groups = [
        [CellId(10), CellId(11)],
        [CellId(20), CellId(21)],
        [CellId(30), CellId(31)],
    ];
    let mut records = Vec::with_capacity(6 * SLOTS);
    for slot in 0..SLOTS {
        let flags = [
            active(slot, 0, false),
            active(slot, HOP, false),
            active(slot, 2 * HOP, true),
        ];
        for (group, &on) in groups.iter().zip(&flags) {
            for cell in group {
                records.push(SlotRecord {
                    slot_id: slot as i64,
                    cell_id: cell.value(),
                    throughput_slot: None,
                    loss_event: None,
                    congestion_event: Some(i64::from(on)),
                });
            }
        }
    }

    CascadeScenario {
        records,
        groups,
        hop_lag: HOP as i64,
    }
}

/// `cells` independent 0/1 series over `slots` slots with activity
/// probability `p`.
pub fn random_indicators(cells: usize, slots: usize, p: f64, seed: u64) -> Vec<CellSeries> {
    let mut rng = SimpleRng::new(seed);
    (0..cells)
        .map(|c| {
            let values = (0..slots)
                .map(|_| if rng.next_f64() < p { 1.0 } else { 0.0 })
                .collect();
            CellSeries::from_values(CellId(c as i64), values)
        })
        .collect()
}
