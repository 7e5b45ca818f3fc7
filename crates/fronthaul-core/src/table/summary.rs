//! Table summary for logging and stored upload metadata.

use serde::Serialize;

use super::SlotTable;
use crate::types::{CellId, SignalKind, SlotId};

/// Shape of an ingested table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub records_count: usize,
    pub cell_ids: Vec<CellId>,
    pub first_slot: SlotId,
    pub last_slot: SlotId,
    pub columns: Vec<SignalKind>,
}

impl TableSummary {
    pub(crate) fn from_table(table: &SlotTable) -> Self {
        let records = table.records();
        let first_slot = records.iter().map(|r| r.slot_id).min().unwrap_or_default();
        let last_slot = records.iter().map(|r| r.slot_id).max().unwrap_or_default();
        let columns = [SignalKind::Throughput, SignalKind::Loss, SignalKind::Congestion]
            .into_iter()
            .filter(|k| table.has(*k))
            .collect();
        Self {
            records_count: records.len(),
            cell_ids: table.cell_ids(),
            first_slot,
            last_slot,
            columns,
        }
    }
}
