//! Similarity stage configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::types::{SignalKind, SimilarityMethod};

/// Configuration for the similarity stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Similarity method. Default: correlation.
    pub method: Option<SimilarityMethod>,
    /// Column compared across cells. Default: first of congestion, loss, throughput present.
    pub signal: Option<SignalKind>,
    /// Replace each series by its robust z-score before correlating. Default: false.
    pub prewhiten: Option<bool>,
    /// Rolling window for pre-whitening. Default: 200.
    pub window: Option<usize>,
    /// Minimum samples before the pre-whitening baseline is defined. Default: 50.
    pub min_periods: Option<usize>,
}

impl SimilarityConfig {
    pub fn effective_method(&self) -> SimilarityMethod {
        self.method.unwrap_or_default()
    }

    pub fn effective_prewhiten(&self) -> bool {
        self.prewhiten.unwrap_or(false)
    }

    pub fn effective_window(&self) -> usize {
        self.window.unwrap_or(constants::DEFAULT_WINDOW)
    }

    pub fn effective_min_periods(&self) -> usize {
        self.min_periods.unwrap_or(constants::DEFAULT_MIN_PERIODS)
    }

    pub(crate) fn merge_from(&mut self, other: &SimilarityConfig) {
        if other.method.is_some() {
            self.method = other.method;
        }
        if other.signal.is_some() {
            self.signal = other.signal;
        }
        if other.prewhiten.is_some() {
            self.prewhiten = other.prewhiten;
        }
        if other.window.is_some() {
            self.window = other.window;
        }
        if other.min_periods.is_some() {
            self.min_periods = other.min_periods;
        }
    }
}
