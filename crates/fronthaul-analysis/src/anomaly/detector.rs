//! Rolling-baseline anomaly detection over per-cell series.

use rayon::prelude::*;

use fronthaul_core::types::CellSeries;

use super::rules::AnomalyRule;
use super::types::{
    AnomalyParams, AnomalyRecord, AnomalyResult, AnomalyStatistics, CellAnomalySummary, Severity,
};
use crate::stats::RollingBaseline;

/// Detect anomalous slots and flag cells whose anomalous-slot rate exceeds
/// `params.flag_rate`.
///
/// The rate is taken over evaluated slots, those with a defined baseline.
/// A flagged cell's confidence score is the mean slot confidence over its
/// anomalous slots; an unflagged cell scores 0.
pub fn detect_anomalies(series: &[CellSeries], params: &AnomalyParams) -> AnomalyResult {
    let mut per_cell: Vec<(CellAnomalySummary, Vec<AnomalyRecord>)> =
        series.par_iter().map(|s| analyze_cell(s, params)).collect();
    per_cell.sort_by_key(|(summary, _)| summary.cell_id);

    let scores: Vec<f64> = per_cell.iter().map(|(s, _)| s.confidence_score).collect();
    let mut anomalies = Vec::new();
    let mut normal_cells = Vec::new();
    let mut records = Vec::new();
    for (summary, cell_records) in per_cell {
        records.extend(cell_records);
        if summary.is_anomaly {
            anomalies.push(summary);
        } else {
            normal_cells.push(summary);
        }
    }

    tracing::info!(
        cell_count = series.len(),
        flagged = anomalies.len(),
        rule = %params.rule.kind(),
        "anomaly detection complete"
    );

    AnomalyResult {
        rule: params.rule,
        total_cells_analyzed: series.len(),
        anomalies_detected: anomalies.len(),
        anomalies,
        normal_cells,
        records,
        statistics: AnomalyStatistics::from_scores(&scores),
    }
}

fn analyze_cell(
    series: &CellSeries,
    params: &AnomalyParams,
) -> (CellAnomalySummary, Vec<AnomalyRecord>) {
    let values = series.values();
    let baseline = RollingBaseline::compute(values, params.window, params.min_periods);

    let mut records = Vec::with_capacity(values.len());
    let mut evaluated = 0usize;
    let mut anomalous = 0usize;
    let mut confidence_sum = 0.0;

    for (i, (slot_id, x)) in series.iter().enumerate() {
        let verdict = params
            .rule
            .evaluate(x, baseline.median[i], baseline.mad[i], params.epsilon);
        let record = match verdict {
            Some(v) => {
                evaluated += 1;
                if v.is_anomaly {
                    anomalous += 1;
                    confidence_sum += v.confidence;
                }
                AnomalyRecord {
                    cell_id: series.cell_id,
                    slot_id,
                    is_anomaly: v.is_anomaly,
                    confidence: v.confidence,
                    score: Some(v.score),
                }
            }
            None => AnomalyRecord {
                cell_id: series.cell_id,
                slot_id,
                is_anomaly: false,
                confidence: 0.0,
                score: None,
            },
        };
        records.push(record);
    }

    let anomaly_rate = if evaluated > 0 {
        anomalous as f64 / evaluated as f64
    } else {
        0.0
    };
    let is_anomaly = anomaly_rate > params.flag_rate;
    let confidence_score = if is_anomaly && anomalous > 0 {
        confidence_sum / anomalous as f64
    } else {
        0.0
    };
    let severity = Severity::from_confidence(is_anomaly, confidence_score);

    if evaluated == 0 {
        tracing::warn!(
            cell_id = %series.cell_id,
            slots = values.len(),
            "baseline never defined, no slot evaluated"
        );
    } else {
        tracing::debug!(
            cell_id = %series.cell_id,
            evaluated,
            anomalous,
            anomaly_rate,
            "cell analyzed"
        );
    }

    let summary = CellAnomalySummary {
        cell_id: series.cell_id,
        confidence_score,
        is_anomaly,
        severity,
        explanation: explain(&params.rule, severity).to_string(),
        anomaly_rate,
        anomalous_slots: anomalous,
        evaluated_slots: evaluated,
    };
    (summary, records)
}

fn explain(rule: &AnomalyRule, severity: Severity) -> &'static str {
    match (rule, severity) {
        (_, Severity::None) => "Signal stays within its rolling baseline",
        (AnomalyRule::ZScore { .. }, Severity::Low) => {
            "Signal frequently dips just past the robust z-score threshold"
        }
        (AnomalyRule::ZScore { .. }, Severity::Medium) => {
            "Signal frequently falls well below its rolling baseline"
        }
        (AnomalyRule::ZScore { .. }, Severity::High) => {
            "Signal repeatedly collapses far below its rolling baseline"
        }
        (AnomalyRule::DropRatio { .. }, Severity::Low) => {
            "Signal frequently drops just past the allowed ratio"
        }
        (AnomalyRule::DropRatio { .. }, Severity::Medium) => {
            "Signal frequently loses a large share of its baseline"
        }
        (AnomalyRule::DropRatio { .. }, Severity::High) => {
            "Signal repeatedly loses most of its baseline"
        }
    }
}
