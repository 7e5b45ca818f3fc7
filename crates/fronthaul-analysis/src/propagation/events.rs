//! Pairwise group events.

use super::signals::GroupSignal;
use super::types::{Direction, PropagationEvent, PropagationParams};
use super::xcorr::{best_lag, correlation_p_value, LagEstimate};
use crate::stats;

/// Confidence reported for an event never exceeds this.
const MAX_EVENT_CONFIDENCE: f64 = 0.95;

/// Best lag between two aligned signals after normalization, or `None`
/// when they are shorter than `params.min_signal_length`.
pub fn pair_lag(a: &[f64], b: &[f64], params: &PropagationParams) -> Option<LagEstimate> {
    if a.len() < params.min_signal_length || b.len() < params.min_signal_length {
        return None;
    }
    let a = stats::normalize(a, params.epsilon);
    let b = stats::normalize(b, params.epsilon);
    Some(best_lag(&a, &b, params.max_lag))
}

/// Events between every unordered pair of distinct groups, in group order.
///
/// A positive lag makes the first group of the pair the source.
pub fn detect_events(signals: &[GroupSignal], params: &PropagationParams) -> Vec<PropagationEvent> {
    let mut events = Vec::new();
    for (i, first) in signals.iter().enumerate() {
        for second in &signals[i + 1..] {
            let (a, b) = first.align(second);
            let Some(est) = pair_lag(&a, &b, params) else {
                tracing::debug!(
                    first = %first.group_id,
                    second = %second.group_id,
                    common_slots = a.len(),
                    "signals too short for lag analysis"
                );
                continue;
            };
            tracing::debug!(
                first = %first.group_id,
                second = %second.group_id,
                lag = est.lag,
                correlation = est.correlation,
                "group pair analyzed"
            );
            if est.correlation.abs() < params.min_correlation {
                continue;
            }

            let direction = Direction::from_lag(est.lag);
            let (source, target) = match direction {
                Direction::Upstream => (second.group_id, first.group_id),
                Direction::Downstream | Direction::Simultaneous => {
                    (first.group_id, second.group_id)
                }
            };
            events.push(PropagationEvent {
                event_id: format!("evt_{:03}", events.len() + 1),
                source_group: source,
                target_group: target,
                lag_slots: est.lag,
                delay_ms: est.lag.unsigned_abs() as f64 * params.slot_duration_ms,
                correlation: est.correlation,
                direction,
                confidence: (est.correlation.abs() + 0.1).min(MAX_EVENT_CONFIDENCE),
                p_value: correlation_p_value(est.correlation, est.overlap),
            });
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use fronthaul_core::types::GroupId;

    fn signal(n: usize, values: Vec<f64>) -> GroupSignal {
        GroupSignal {
            group_id: GroupId::from_index(n),
            slots: (0..values.len() as i64).collect(),
            values,
        }
    }

    /// Irregularly spaced unit pulses, shifted right by `offset`.
    fn pulses(len: usize, offset: usize) -> Vec<f64> {
        const AT: [usize; 12] = [3, 11, 29, 37, 58, 71, 90, 104, 131, 149, 160, 177];
        let mut v = vec![0.0; len];
        for i in AT.iter().map(|i| i + offset).filter(|&i| i < len) {
            v[i] = 1.0;
        }
        v
    }

    #[test]
    fn leading_first_group_is_downstream() {
        let params = PropagationParams::default();
        let events = detect_events(&[signal(0, pulses(200, 0)), signal(1, pulses(200, 4))], &params);
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.event_id, "evt_001");
        assert_eq!(e.direction, Direction::Downstream);
        assert_eq!(e.source_group, GroupId(1));
        assert_eq!(e.target_group, GroupId(2));
        assert_eq!(e.lag_slots, 4);
        assert!((e.delay_ms - 0.4).abs() < 1e-12);
        assert!((e.confidence - 0.95).abs() < 1e-12);
    }

    #[test]
    fn leading_second_group_is_upstream() {
        let params = PropagationParams::default();
        let events = detect_events(&[signal(0, pulses(200, 4)), signal(1, pulses(200, 0))], &params);
        assert_eq!(events[0].direction, Direction::Upstream);
        assert_eq!(events[0].source_group, GroupId(2));
        assert_eq!(events[0].target_group, GroupId(1));
        assert_eq!(events[0].lag_slots, -4);
    }

    #[test]
    fn short_signals_are_skipped() {
        let params = PropagationParams::default();
        let events = detect_events(&[signal(0, pulses(9, 0)), signal(1, pulses(9, 0))], &params);
        assert!(events.is_empty());
    }

    #[test]
    fn weak_correlation_creates_no_event() {
        let params = PropagationParams {
            min_correlation: 0.99,
            ..Default::default()
        };
        let mut b = pulses(200, 4);
        b[100] = 1.0;
        b[150] = 1.0;
        b[33] = 0.0;
        let events = detect_events(&[signal(0, pulses(200, 0)), signal(1, b)], &params);
        assert!(events.is_empty());
    }
}
