//! Propagation stage configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::types::IndicatorSource;

/// Configuration for the propagation stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PropagationConfig {
    /// Maximum cross-correlation lag, in slots. Default: 50.
    pub max_lag: Option<usize>,
    /// Minimum |correlation| for an event. Default: 0.6.
    pub min_correlation: Option<f64>,
    /// Slot duration in milliseconds. Default: 0.1.
    pub slot_duration_ms: Option<f64>,
    /// Minimum aligned signal length for a pair to be analyzed. Default: 10.
    pub min_signal_length: Option<usize>,
    /// Per-cell indicator feeding the analysis. Default: anomaly.
    pub indicator: Option<IndicatorSource>,
}

impl PropagationConfig {
    pub fn effective_max_lag(&self) -> usize {
        self.max_lag.unwrap_or(constants::DEFAULT_MAX_LAG)
    }

    pub fn effective_min_correlation(&self) -> f64 {
        self.min_correlation
            .unwrap_or(constants::DEFAULT_MIN_CORRELATION)
    }

    pub fn effective_slot_duration_ms(&self) -> f64 {
        self.slot_duration_ms
            .unwrap_or(constants::DEFAULT_SLOT_DURATION_MS)
    }

    pub fn effective_min_signal_length(&self) -> usize {
        self.min_signal_length
            .unwrap_or(constants::DEFAULT_MIN_SIGNAL_LENGTH)
    }

    pub fn effective_indicator(&self) -> IndicatorSource {
        self.indicator.unwrap_or_default()
    }

    pub(crate) fn merge_from(&mut self, other: &PropagationConfig) {
        if other.max_lag.is_some() {
            self.max_lag = other.max_lag;
        }
        if other.min_correlation.is_some() {
            self.min_correlation = other.min_correlation;
        }
        if other.slot_duration_ms.is_some() {
            self.slot_duration_ms = other.slot_duration_ms;
        }
        if other.min_signal_length.is_some() {
            self.min_signal_length = other.min_signal_length;
        }
        if other.indicator.is_some() {
            self.indicator = other.indicator;
        }
    }
}
