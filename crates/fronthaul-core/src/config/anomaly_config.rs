//! Anomaly stage configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::types::AnomalyRuleKind;

/// Configuration for the anomaly stage.
///
/// Both rules keep their own threshold so switching `rule` never silently
/// reuses a threshold meant for the other metric.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Detection rule. Default: z_score.
    pub rule: Option<AnomalyRuleKind>,
    /// Robust z-score threshold (negative). Default: -3.5.
    pub z_threshold: Option<f64>,
    /// Drop-ratio threshold. Default: 0.30.
    pub drop_threshold: Option<f64>,
    /// Rolling baseline window, in slots. Default: 200.
    pub window: Option<usize>,
    /// Minimum samples before the baseline is defined. Default: 50.
    pub min_periods: Option<usize>,
    /// Division guard. Default: 1e-6.
    pub epsilon: Option<f64>,
    /// Anomalous-slot fraction above which a cell is flagged. Default: 0.25.
    pub flag_rate: Option<f64>,
    /// Peer-fit confidence below which a cell is anomalous. Default: 0.5.
    pub peer_fit_threshold: Option<f64>,
}

impl AnomalyConfig {
    pub fn effective_rule(&self) -> AnomalyRuleKind {
        self.rule.unwrap_or_default()
    }

    pub fn effective_z_threshold(&self) -> f64 {
        self.z_threshold.unwrap_or(constants::DEFAULT_Z_THRESHOLD)
    }

    pub fn effective_drop_threshold(&self) -> f64 {
        self.drop_threshold.unwrap_or(constants::DEFAULT_DROP_THRESHOLD)
    }

    pub fn effective_window(&self) -> usize {
        self.window.unwrap_or(constants::DEFAULT_WINDOW)
    }

    pub fn effective_min_periods(&self) -> usize {
        self.min_periods.unwrap_or(constants::DEFAULT_MIN_PERIODS)
    }

    pub fn effective_epsilon(&self) -> f64 {
        self.epsilon.unwrap_or(constants::DEFAULT_EPSILON)
    }

    pub fn effective_flag_rate(&self) -> f64 {
        self.flag_rate.unwrap_or(constants::DEFAULT_FLAG_RATE)
    }

    pub fn effective_peer_fit_threshold(&self) -> f64 {
        self.peer_fit_threshold
            .unwrap_or(constants::DEFAULT_PEER_FIT_THRESHOLD)
    }

    pub(crate) fn merge_from(&mut self, other: &AnomalyConfig) {
        if other.rule.is_some() {
            self.rule = other.rule;
        }
        if other.z_threshold.is_some() {
            self.z_threshold = other.z_threshold;
        }
        if other.drop_threshold.is_some() {
            self.drop_threshold = other.drop_threshold;
        }
        if other.window.is_some() {
            self.window = other.window;
        }
        if other.min_periods.is_some() {
            self.min_periods = other.min_periods;
        }
        if other.epsilon.is_some() {
            self.epsilon = other.epsilon;
        }
        if other.flag_rate.is_some() {
            self.flag_rate = other.flag_rate;
        }
        if other.peer_fit_threshold.is_some() {
            self.peer_fit_threshold = other.peer_fit_threshold;
        }
    }
}
