//! Topology inference: similarity matrix to labelled groups.

use fronthaul_core::config::CutRule;
use fronthaul_core::errors::AnalysisError;
use fronthaul_core::types::{ClusteringStrategy, FxHashMap, GroupId};

use super::dendrogram::{self, Dendrogram};
use super::density::density_labels;
use super::kmeans::kmeans;
use super::types::{CellAssignment, TopologyGroup, TopologyParams, TopologyResult};
use crate::similarity::SimilarityMatrix;

/// Cluster the cells of `matrix` into groups.
///
/// Groups are numbered `Group_1, Group_2, ...` in order of their smallest
/// member cell id. Each assigned cell's confidence is its group's average
/// similarity.
pub fn infer_topology(
    matrix: &SimilarityMatrix,
    params: &TopologyParams,
) -> Result<TopologyResult, AnalysisError> {
    if matrix.is_empty() {
        return Err(AnalysisError::NotEnoughCells {
            required: 1,
            actual: 0,
        });
    }
    let distances = matrix.distance_matrix();

    let (labels, threshold): (Vec<Option<usize>>, Option<f64>) = match params.strategy {
        ClusteringStrategy::Hierarchical => {
            let dg = Dendrogram::average_linkage(&distances);
            match params.cut {
                CutRule::Clusters(k) => (wrap(dg.cut_clusters(k)), None),
                CutRule::Threshold(t) => (wrap(dg.cut_distance(t)), Some(t)),
                CutRule::Auto => match dendrogram::auto_threshold(&distances) {
                    Some(t) => (wrap(dg.cut_distance(t)), Some(t)),
                    None => (wrap(dg.cut_clusters(1)), None),
                },
            }
        }
        ClusteringStrategy::KMeans => {
            let k = match params.cut {
                CutRule::Clusters(k) => k,
                _ => params.kmeans_clusters,
            };
            (wrap(kmeans(&distances, k)), None)
        }
        ClusteringStrategy::Density => (density_labels(&distances, params.min_cluster_size), None),
    };

    let result = build_result(matrix, &labels, params.strategy, threshold);
    tracing::info!(
        cell_count = result.total_cells,
        group_count = result.groups.len(),
        unassigned = result.unassigned_cells.len(),
        strategy = %params.strategy,
        "topology inferred"
    );
    Ok(result)
}

fn wrap(labels: Vec<usize>) -> Vec<Option<usize>> {
    labels.into_iter().map(Some).collect()
}

/// Relabel clusters by smallest member and assemble the result.
fn build_result(
    matrix: &SimilarityMatrix,
    labels: &[Option<usize>],
    strategy: ClusteringStrategy,
    threshold: Option<f64>,
) -> TopologyResult {
    let cell_ids = matrix.cell_ids();

    let mut members: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    let mut unassigned = Vec::new();
    for (idx, label) in labels.iter().enumerate() {
        match label {
            Some(l) => members.entry(*l).or_default().push(idx),
            None => unassigned.push(cell_ids[idx]),
        }
    }
    unassigned.sort();

    let mut clusters: Vec<Vec<usize>> = members.into_values().collect();
    for indices in &mut clusters {
        indices.sort_by_key(|&i| cell_ids[i]);
    }
    clusters.sort_by_key(|indices| indices.first().map(|&i| cell_ids[i]));

    let mut groups = Vec::with_capacity(clusters.len());
    let mut cell_assignments = Vec::new();
    for (n, indices) in clusters.iter().enumerate() {
        let group_id = GroupId::from_index(n);
        let avg_similarity = matrix.mean_similarity(indices);
        let cells: Vec<_> = indices.iter().map(|&i| cell_ids[i]).collect();
        for &cell_id in &cells {
            cell_assignments.push(CellAssignment {
                cell_id,
                group_id,
                confidence: avg_similarity,
            });
        }
        groups.push(TopologyGroup {
            group_id,
            cell_count: cells.len(),
            cells,
            avg_similarity,
        });
    }
    cell_assignments.sort_by_key(|a| a.cell_id);

    TopologyResult {
        total_cells: cell_ids.len(),
        groups,
        cell_assignments,
        unassigned_cells: unassigned,
        strategy,
        threshold,
    }
}
