//! Anomaly result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use fronthaul_core::config::AnomalyConfig;
use fronthaul_core::types::{AnomalyRuleKind, CellId, CellSeries, SlotId};

use super::rules::AnomalyRule;

/// Parameters for [`super::detect_anomalies`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyParams {
    pub rule: AnomalyRule,
    pub window: usize,
    pub min_periods: usize,
    pub epsilon: f64,
    /// Anomalous-slot fraction above which a cell is flagged.
    pub flag_rate: f64,
}

impl Default for AnomalyParams {
    fn default() -> Self {
        Self::from(&AnomalyConfig::default())
    }
}

impl From<&AnomalyConfig> for AnomalyParams {
    fn from(config: &AnomalyConfig) -> Self {
        let rule = match config.effective_rule() {
            AnomalyRuleKind::ZScore => AnomalyRule::ZScore {
                threshold: config.effective_z_threshold(),
            },
            AnomalyRuleKind::DropRatio => AnomalyRule::DropRatio {
                threshold: config.effective_drop_threshold(),
            },
        };
        Self {
            rule,
            window: config.effective_window(),
            min_periods: config.effective_min_periods(),
            epsilon: config.effective_epsilon(),
            flag_rate: config.effective_flag_rate(),
        }
    }
}

/// Per-slot detection outcome. `confidence` is 0 whenever `is_anomaly` is false.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub cell_id: CellId,
    pub slot_id: SlotId,
    pub is_anomaly: bool,
    pub confidence: f64,
    /// Raw detection metric; absent while the baseline is undefined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// How strongly a flagged cell deviates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    /// Severity of a cell confidence score.
    pub fn from_confidence(is_anomaly: bool, confidence: f64) -> Self {
        if !is_anomaly {
            Self::None
        } else if confidence < 0.4 {
            Self::Low
        } else if confidence < 0.7 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-cell aggregate over all evaluated slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellAnomalySummary {
    pub cell_id: CellId,
    pub confidence_score: f64,
    pub is_anomaly: bool,
    pub severity: Severity,
    pub explanation: String,
    pub anomaly_rate: f64,
    pub anomalous_slots: usize,
    pub evaluated_slots: usize,
}

/// Average, minimum and maximum of the cell confidence scores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnomalyStatistics {
    pub avg_confidence: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
}

impl AnomalyStatistics {
    pub fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let (min, max) = scores
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Self {
            avg_confidence: crate::stats::mean(scores),
            min_confidence: min,
            max_confidence: max,
        }
    }
}

/// Output of the anomaly stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub rule: AnomalyRule,
    pub total_cells_analyzed: usize,
    pub anomalies_detected: usize,
    /// Flagged cells, ascending.
    pub anomalies: Vec<CellAnomalySummary>,
    /// Unflagged cells, ascending.
    pub normal_cells: Vec<CellAnomalySummary>,
    /// Every slot of every cell, ordered by `(cell, slot)`.
    pub records: Vec<AnomalyRecord>,
    pub statistics: AnomalyStatistics,
}

impl AnomalyResult {
    /// Summary for `cell`, flagged or not.
    pub fn summary(&self, cell: CellId) -> Option<&CellAnomalySummary> {
        self.anomalies
            .iter()
            .chain(&self.normal_cells)
            .find(|s| s.cell_id == cell)
    }

    /// Per-cell 0/1 anomaly indicator over every slot, ascending by cell.
    pub fn indicators(&self) -> Vec<CellSeries> {
        let mut out: Vec<CellSeries> = Vec::new();
        let mut start = 0;
        while start < self.records.len() {
            let cell = self.records[start].cell_id;
            let end = self.records[start..]
                .iter()
                .position(|r| r.cell_id != cell)
                .map_or(self.records.len(), |p| start + p);
            let samples = self.records[start..end]
                .iter()
                .map(|r| (r.slot_id, if r.is_anomaly { 1.0 } else { 0.0 }))
                .collect();
            // Records come from a validated series, so slots are unique.
            if let Ok(series) = CellSeries::new(cell, samples) {
                out.push(series);
            }
            start = end;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_bands() {
        assert_eq!(Severity::from_confidence(false, 0.9), Severity::None);
        assert_eq!(Severity::from_confidence(true, 0.1), Severity::Low);
        assert_eq!(Severity::from_confidence(true, 0.5), Severity::Medium);
        assert_eq!(Severity::from_confidence(true, 0.7), Severity::High);
    }

    #[test]
    fn statistics_of_nothing_are_zero() {
        assert_eq!(AnomalyStatistics::from_scores(&[]), AnomalyStatistics::default());
        let s = AnomalyStatistics::from_scores(&[0.2, 0.6]);
        assert!((s.avg_confidence - 0.4).abs() < 1e-12);
        assert_eq!(s.min_confidence, 0.2);
        assert_eq!(s.max_confidence, 0.6);
    }

    #[test]
    fn params_follow_the_configured_rule() {
        let config = AnomalyConfig {
            rule: Some(AnomalyRuleKind::DropRatio),
            drop_threshold: Some(0.4),
            ..Default::default()
        };
        let params = AnomalyParams::from(&config);
        assert_eq!(params.rule, AnomalyRule::DropRatio { threshold: 0.4 });
        assert_eq!(AnomalyParams::default().rule, AnomalyRule::ZScore { threshold: -3.5 });
    }
}
