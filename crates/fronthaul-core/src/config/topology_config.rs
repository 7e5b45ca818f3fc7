//! Topology stage configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::types::ClusteringStrategy;

/// How the clustering result is cut into flat groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutRule {
    /// Exactly this many clusters.
    Clusters(usize),
    /// Merge everything closer than this distance (`1 - similarity`).
    Threshold(f64),
    /// `median + 0.5 * std` of the pairwise distances.
    Auto,
}

/// Configuration for the topology stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TopologyConfig {
    /// Clustering strategy. Default: hierarchical.
    pub strategy: Option<ClusteringStrategy>,
    /// Target cluster count. Takes precedence over `distance_threshold`.
    pub num_clusters: Option<usize>,
    /// Explicit distance threshold for the dendrogram cut.
    pub distance_threshold: Option<f64>,
    /// Minimum cluster size for density clustering. Default: 2.
    pub min_cluster_size: Option<usize>,
}

impl TopologyConfig {
    pub fn effective_strategy(&self) -> ClusteringStrategy {
        self.strategy.unwrap_or_default()
    }

    /// Cluster count first, then explicit threshold, else auto.
    pub fn effective_cut(&self) -> CutRule {
        match (self.num_clusters, self.distance_threshold) {
            (Some(k), _) => CutRule::Clusters(k),
            (None, Some(d)) => CutRule::Threshold(d),
            (None, None) => CutRule::Auto,
        }
    }

    pub fn effective_min_cluster_size(&self) -> usize {
        self.min_cluster_size.unwrap_or(2)
    }

    /// K-means cluster count: the configured count, else the default.
    pub fn effective_kmeans_clusters(&self) -> usize {
        self.num_clusters
            .unwrap_or(constants::DEFAULT_KMEANS_CLUSTERS)
    }

    pub(crate) fn merge_from(&mut self, other: &TopologyConfig) {
        if other.strategy.is_some() {
            self.strategy = other.strategy;
        }
        if other.num_clusters.is_some() {
            self.num_clusters = other.num_clusters;
        }
        if other.distance_threshold.is_some() {
            self.distance_threshold = other.distance_threshold;
        }
        if other.min_cluster_size.is_some() {
            self.min_cluster_size = other.min_cluster_size;
        }
    }
}
