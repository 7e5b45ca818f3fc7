//! One per-cell-per-slot telemetry row.

use serde::{Deserialize, Serialize};

use crate::errors::InputError;
use crate::types::SignalKind;

/// Input row. At least one of the signal columns must be present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlotRecord {
    pub slot_id: i64,
    pub cell_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput_slot: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_event: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub congestion_event: Option<i64>,
}

impl SlotRecord {
    /// Value of the column for `kind`, as a float.
    pub fn signal(&self, kind: SignalKind) -> Option<f64> {
        match kind {
            SignalKind::Throughput => self.throughput_slot,
            SignalKind::Loss => self.loss_event.map(|v| v as f64),
            SignalKind::Congestion => self.congestion_event.map(|v| v as f64),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), InputError> {
        if self.throughput_slot.is_none()
            && self.loss_event.is_none()
            && self.congestion_event.is_none()
        {
            return Err(InputError::NoSignal {
                cell_id: self.cell_id,
                slot_id: self.slot_id,
            });
        }
        if let Some(t) = self.throughput_slot {
            if !t.is_finite() {
                return Err(InputError::NonFinite {
                    column: SignalKind::Throughput.column().to_string(),
                    cell_id: self.cell_id,
                    slot_id: self.slot_id,
                });
            }
        }
        for (kind, value) in [
            (SignalKind::Loss, self.loss_event),
            (SignalKind::Congestion, self.congestion_event),
        ] {
            if let Some(v) = value {
                if v != 0 && v != 1 {
                    return Err(InputError::NonBinary {
                        column: kind.column().to_string(),
                        cell_id: self.cell_id,
                        slot_id: self.slot_id,
                        value: v,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_without_signal_is_invalid() {
        let r = SlotRecord {
            slot_id: 4,
            cell_id: 9,
            ..Default::default()
        };
        assert!(matches!(r.validate(), Err(InputError::NoSignal { cell_id: 9, slot_id: 4 })));
    }

    #[test]
    fn non_binary_indicator_is_invalid() {
        let r = SlotRecord {
            slot_id: 0,
            cell_id: 1,
            congestion_event: Some(2),
            ..Default::default()
        };
        assert!(matches!(r.validate(), Err(InputError::NonBinary { value: 2, .. })));
    }

    #[test]
    fn indicator_reads_as_float() {
        let r = SlotRecord {
            slot_id: 0,
            cell_id: 1,
            loss_event: Some(1),
            ..Default::default()
        };
        assert_eq!(r.signal(SignalKind::Loss), Some(1.0));
        assert_eq!(r.signal(SignalKind::Congestion), None);
    }
}
