//! Density-based clustering via HDBSCAN over distance-matrix rows.

use hdbscan::{Hdbscan, HdbscanHyperParams};

/// Cluster labels per point; `None` marks noise.
///
/// Fewer points than `min_cluster_size`, or a clustering failure, leaves
/// every point as noise.
pub fn density_labels(points: &[Vec<f64>], min_cluster_size: usize) -> Vec<Option<usize>> {
    if points.len() < min_cluster_size.max(2) {
        return vec![None; points.len()];
    }

    let hyper_params = HdbscanHyperParams::builder()
        .min_cluster_size(min_cluster_size.max(2))
        .min_samples(1)
        .build();

    let data = points.to_vec();
    let clusterer = Hdbscan::new(&data, hyper_params);
    match clusterer.cluster() {
        Ok(labels) => labels
            .into_iter()
            .map(|l| usize::try_from(l).ok())
            .collect(),
        Err(e) => {
            tracing::warn!(error = ?e, "density clustering failed, all cells unassigned");
            vec![None; points.len()]
        }
    }
}
