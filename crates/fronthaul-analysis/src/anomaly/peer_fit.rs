//! Peer-fit scoring: how well each cell agrees with the rest of its group.

use serde::{Deserialize, Serialize};

use fronthaul_core::types::{CellId, GroupId};

use super::types::{AnomalyStatistics, Severity};
use crate::similarity::SimilarityMatrix;
use crate::topology::TopologyResult;

/// One cell's fit within its group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerFitScore {
    pub cell_id: CellId,
    pub group_id: GroupId,
    /// Mean similarity to the other members; 1.0 for singletons.
    pub confidence_score: f64,
    pub is_anomaly: bool,
    pub severity: Severity,
    /// `(1 - confidence) * 100` for anomalous cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation_percentage: Option<f64>,
    pub explanation: String,
}

/// Peer-fit scores for every assigned cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerFitResult {
    pub threshold: f64,
    pub total_cells_analyzed: usize,
    pub anomalies_detected: usize,
    pub anomalies: Vec<PeerFitScore>,
    pub normal_cells: Vec<PeerFitScore>,
    pub statistics: AnomalyStatistics,
}

/// Score each assigned cell by its mean similarity to its group peers.
///
/// A cell is anomalous when that mean falls below `threshold`. Members
/// missing from `matrix` are skipped.
pub fn score_peer_fit(
    matrix: &SimilarityMatrix,
    topology: &TopologyResult,
    threshold: f64,
) -> PeerFitResult {
    let mut anomalies = Vec::new();
    let mut normal_cells = Vec::new();
    let mut scores = Vec::new();

    for group in &topology.groups {
        let indices: Vec<(CellId, usize)> = group
            .cells
            .iter()
            .filter_map(|&c| matrix.index_of(c).map(|i| (c, i)))
            .collect();

        for &(cell_id, idx) in &indices {
            let peers: Vec<f64> = indices
                .iter()
                .filter(|&&(_, j)| j != idx)
                .map(|&(_, j)| matrix.get(idx, j))
                .collect();
            let confidence = if peers.is_empty() {
                1.0
            } else {
                crate::stats::mean(&peers)
            };
            let is_anomaly = confidence < threshold;
            scores.push(confidence);

            let score = PeerFitScore {
                cell_id,
                group_id: group.group_id,
                confidence_score: confidence,
                is_anomaly,
                severity: severity(confidence, threshold),
                deviation_percentage: is_anomaly.then(|| (1.0 - confidence) * 100.0),
                explanation: explain(confidence, is_anomaly).to_string(),
            };
            if is_anomaly {
                anomalies.push(score);
            } else {
                normal_cells.push(score);
            }
        }
    }

    tracing::info!(
        cell_count = scores.len(),
        flagged = anomalies.len(),
        threshold,
        "peer-fit scoring complete"
    );

    PeerFitResult {
        threshold,
        total_cells_analyzed: scores.len(),
        anomalies_detected: anomalies.len(),
        anomalies,
        normal_cells,
        statistics: AnomalyStatistics::from_scores(&scores),
    }
}

/// Bands relative to the threshold: ≥ t none, ≥ 0.7t low, ≥ 0.5t medium.
fn severity(confidence: f64, threshold: f64) -> Severity {
    if confidence >= threshold {
        Severity::None
    } else if confidence >= threshold * 0.7 {
        Severity::Low
    } else if confidence >= threshold * 0.5 {
        Severity::Medium
    } else {
        Severity::High
    }
}

fn explain(confidence: f64, is_anomaly: bool) -> &'static str {
    if !is_anomaly {
        "Cell behavior aligns with its assigned group"
    } else if confidence < 0.3 {
        "Cell shows much lower correlation than its group peers"
    } else if confidence < 0.5 {
        "Cell deviates noticeably from its group's behavior"
    } else {
        "Cell is slightly inconsistent with its group pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{infer_topology, TopologyParams};
    use fronthaul_core::config::CutRule;
    use fronthaul_core::types::SimilarityMethod;

    fn matrix() -> SimilarityMatrix {
        SimilarityMatrix::new(
            vec![
                vec![1.0, 0.9, 0.3, 0.1],
                vec![0.9, 1.0, 0.2, 0.1],
                vec![0.3, 0.2, 1.0, 0.1],
                vec![0.1, 0.1, 0.1, 1.0],
            ],
            (1..=4).map(CellId).collect(),
            SimilarityMethod::Correlation,
        )
        .unwrap()
    }

    #[test]
    fn outlier_member_is_flagged() {
        let m = matrix();
        let topo = infer_topology(
            &m,
            &TopologyParams {
                cut: CutRule::Clusters(2),
                ..Default::default()
            },
        )
        .unwrap();
        // {1, 2, 3} and {4}
        assert_eq!(topo.groups[0].cells.len(), 3);

        let r = score_peer_fit(&m, &topo, 0.5);
        assert_eq!(r.total_cells_analyzed, 4);
        assert_eq!(r.anomalies_detected, 1);
        let flagged = &r.anomalies[0];
        assert_eq!(flagged.cell_id, CellId(3));
        assert!((flagged.confidence_score - 0.25).abs() < 1e-12);
        assert_eq!(flagged.severity, Severity::Medium);
        assert!((flagged.deviation_percentage.unwrap() - 75.0).abs() < 1e-9);

        let singleton = r.normal_cells.iter().find(|s| s.cell_id == CellId(4)).unwrap();
        assert_eq!(singleton.confidence_score, 1.0);
        assert_eq!(singleton.severity, Severity::None);
    }

    #[test]
    fn severity_bands_scale_with_threshold() {
        assert_eq!(severity(0.5, 0.5), Severity::None);
        assert_eq!(severity(0.36, 0.5), Severity::Low);
        assert_eq!(severity(0.25, 0.5), Severity::Medium);
        assert_eq!(severity(0.2, 0.5), Severity::High);
    }
}
