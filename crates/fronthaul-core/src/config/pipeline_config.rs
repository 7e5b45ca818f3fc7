//! Batch pipeline configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the batch pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    /// Run the propagation stage. Default: true.
    pub propagation: Option<bool>,
    /// Derive a congestion indicator from throughput when the table has none. Default: true.
    pub derive_congestion: Option<bool>,
}

impl PipelineConfig {
    pub fn effective_propagation(&self) -> bool {
        self.propagation.unwrap_or(true)
    }

    pub fn effective_derive_congestion(&self) -> bool {
        self.derive_congestion.unwrap_or(true)
    }

    pub(crate) fn merge_from(&mut self, other: &PipelineConfig) {
        if other.propagation.is_some() {
            self.propagation = other.propagation;
        }
        if other.derive_congestion.is_some() {
            self.derive_congestion = other.derive_congestion;
        }
    }
}
