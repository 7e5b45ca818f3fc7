//! Ingestion table: validated per-cell-per-slot telemetry records.

pub mod record;
pub mod summary;

pub use record::SlotRecord;
pub use summary::TableSummary;

use std::collections::BTreeMap;

use crate::errors::InputError;
use crate::types::{CellId, CellSeries, SignalKind, SlotId};

/// Validated batch of slot records, ordered by `(cell_id, slot_id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTable {
    records: Vec<SlotRecord>,
}

impl SlotTable {
    /// Validate and order `records`.
    ///
    /// Rejects an empty batch, rows with no signal column, non-binary
    /// indicators, non-finite throughput, and duplicate `(cell, slot)` rows.
    pub fn from_records(mut records: Vec<SlotRecord>) -> Result<Self, InputError> {
        if records.is_empty() {
            return Err(InputError::Empty);
        }
        for record in &records {
            record.validate()?;
        }
        records.sort_by_key(|r| (r.cell_id, r.slot_id));
        if let Some(w) = records
            .windows(2)
            .find(|w| w[0].cell_id == w[1].cell_id && w[0].slot_id == w[1].slot_id)
        {
            return Err(InputError::DuplicateSlot {
                cell_id: w[0].cell_id,
                slot_id: w[0].slot_id,
            });
        }
        Ok(Self { records })
    }

    /// Parse a JSON array of records and validate it.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        let records: Vec<SlotRecord> =
            serde_json::from_str(json).map_err(|e| InputError::Malformed(e.to_string()))?;
        Self::from_records(records)
    }

    pub fn records(&self) -> &[SlotRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct cell ids, ascending.
    pub fn cell_ids(&self) -> Vec<CellId> {
        let mut ids: Vec<CellId> = self.records.iter().map(|r| CellId(r.cell_id)).collect();
        ids.dedup();
        ids
    }

    /// Whether any record carries the column for `kind`.
    pub fn has(&self, kind: SignalKind) -> bool {
        self.records.iter().any(|r| r.signal(kind).is_some())
    }

    /// Fail with `MissingColumn` unless some record carries `kind`.
    pub fn require(&self, kind: SignalKind) -> Result<(), InputError> {
        if self.has(kind) {
            Ok(())
        } else {
            Err(InputError::MissingColumn {
                column: kind.column().to_string(),
            })
        }
    }

    /// Extract one series per cell for `kind`, ascending by cell id.
    /// Rows without the column are skipped; cells with no such row are omitted.
    pub fn series(&self, kind: SignalKind) -> Result<Vec<CellSeries>, InputError> {
        self.require(kind)?;
        let mut by_cell: BTreeMap<CellId, Vec<(SlotId, f64)>> = BTreeMap::new();
        for record in &self.records {
            if let Some(value) = record.signal(kind) {
                by_cell
                    .entry(CellId(record.cell_id))
                    .or_default()
                    .push((record.slot_id, value));
            }
        }
        by_cell
            .into_iter()
            .map(|(cell_id, samples)| CellSeries::new(cell_id, samples))
            .collect()
    }

    /// Record count, cells, slot range, and available columns.
    pub fn summary(&self) -> TableSummary {
        TableSummary::from_table(self)
    }
}
