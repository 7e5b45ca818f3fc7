//! Detection rules and the shared confidence mapping.

use serde::{Deserialize, Serialize};

use fronthaul_core::types::AnomalyRuleKind;

/// A configured detection rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum AnomalyRule {
    /// `z = (x - median) / (MAD + ε)`, anomalous when `z < threshold`.
    ZScore { threshold: f64 },
    /// `(median - x) / (median + ε)`, anomalous when the ratio exceeds `threshold`.
    DropRatio { threshold: f64 },
}

/// Outcome of evaluating one slot against its baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotVerdict {
    /// Raw detection metric (z-score or drop ratio).
    pub score: f64,
    pub is_anomaly: bool,
    pub confidence: f64,
}

impl AnomalyRule {
    pub fn kind(&self) -> AnomalyRuleKind {
        match self {
            Self::ZScore { .. } => AnomalyRuleKind::ZScore,
            Self::DropRatio { .. } => AnomalyRuleKind::DropRatio,
        }
    }

    /// Whether the rule needs a MAD in addition to the median.
    pub fn needs_mad(&self) -> bool {
        matches!(self, Self::ZScore { .. })
    }

    /// Evaluate `x` against the baseline. `None` when the baseline the rule
    /// needs is undefined.
    pub fn evaluate(&self, x: f64, median: f64, mad: f64, epsilon: f64) -> Option<SlotVerdict> {
        if !median.is_finite() || (self.needs_mad() && !mad.is_finite()) {
            return None;
        }
        let (score, exceedance, limit, is_anomaly) = match *self {
            Self::ZScore { threshold } => {
                let z = (x - median) / (mad + epsilon);
                (z, -z, threshold.abs(), z < threshold)
            }
            Self::DropRatio { threshold } => {
                let ratio = (median - x) / (median + epsilon);
                (ratio, ratio, threshold.abs(), ratio > threshold)
            }
        };
        let confidence = if is_anomaly {
            confidence(exceedance, limit)
        } else {
            0.0
        };
        Some(SlotVerdict {
            score,
            is_anomaly,
            confidence,
        })
    }
}

/// `clamp((e - t) / t, 0, 1)`: zero at the threshold, one at twice its
/// distance from the baseline.
pub fn confidence(exceedance: f64, limit: f64) -> f64 {
    if limit <= 0.0 || !exceedance.is_finite() {
        return if exceedance > limit { 1.0 } else { 0.0 };
    }
    ((exceedance - limit) / limit).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_score_flags_deep_drops_only() {
        let rule = AnomalyRule::ZScore { threshold: -3.5 };
        let v = rule.evaluate(50.0, 100.0, 10.0, 0.0).unwrap();
        assert_eq!(v.score, -5.0);
        assert!(v.is_anomaly);
        assert!((v.confidence - (5.0 - 3.5) / 3.5).abs() < 1e-12);

        let spike = rule.evaluate(150.0, 100.0, 10.0, 0.0).unwrap();
        assert!(!spike.is_anomaly);
        assert_eq!(spike.confidence, 0.0);
    }

    #[test]
    fn drop_ratio_flags_collapses() {
        let rule = AnomalyRule::DropRatio { threshold: 0.30 };
        let v = rule.evaluate(40.0, 100.0, f64::NAN, 0.0).unwrap();
        assert!((v.score - 0.6).abs() < 1e-12);
        assert!(v.is_anomaly);
        assert!((v.confidence - 1.0).abs() < 1e-12);
        assert!(!rule.evaluate(80.0, 100.0, f64::NAN, 0.0).unwrap().is_anomaly);
    }

    #[test]
    fn undefined_baseline_is_not_evaluated() {
        let z = AnomalyRule::ZScore { threshold: -3.5 };
        assert!(z.evaluate(1.0, f64::NAN, 1.0, 1e-6).is_none());
        assert!(z.evaluate(1.0, 1.0, f64::NAN, 1e-6).is_none());
    }

    #[test]
    fn confidence_is_zero_at_threshold_and_clipped() {
        assert_eq!(confidence(3.5, 3.5), 0.0);
        assert_eq!(confidence(7.0, 3.5), 1.0);
        assert_eq!(confidence(100.0, 3.5), 1.0);
        assert!(confidence(4.0, 3.5) < confidence(5.0, 3.5));
    }
}
