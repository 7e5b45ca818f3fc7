//! Topology result types.

use serde::{Deserialize, Serialize};

use fronthaul_core::config::{CutRule, TopologyConfig};
use fronthaul_core::types::{CellId, CellSeries, ClusteringStrategy, GroupId};

/// Parameters for [`super::infer_topology`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopologyParams {
    pub strategy: ClusteringStrategy,
    pub cut: CutRule,
    /// K-means cluster count when `cut` does not fix one.
    pub kmeans_clusters: usize,
    pub min_cluster_size: usize,
}

impl Default for TopologyParams {
    fn default() -> Self {
        Self::from(&TopologyConfig::default())
    }
}

impl From<&TopologyConfig> for TopologyParams {
    fn from(config: &TopologyConfig) -> Self {
        Self {
            strategy: config.effective_strategy(),
            cut: config.effective_cut(),
            kmeans_clusters: config.effective_kmeans_clusters(),
            min_cluster_size: config.effective_min_cluster_size(),
        }
    }
}

/// A group of cells inferred to share fronthaul.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyGroup {
    pub group_id: GroupId,
    /// Members, ascending.
    pub cells: Vec<CellId>,
    /// Mean off-diagonal similarity among members; 1.0 for singletons.
    pub avg_similarity: f64,
    pub cell_count: usize,
}

impl TopologyGroup {
    pub fn contains(&self, cell: CellId) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// Member series from `series`, in the order given.
    pub fn members<'a>(&'a self, series: &'a [CellSeries]) -> impl Iterator<Item = &'a CellSeries> + 'a {
        series.iter().filter(move |s| self.contains(s.cell_id))
    }
}

/// One cell's group membership.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellAssignment {
    pub cell_id: CellId,
    pub group_id: GroupId,
    pub confidence: f64,
}

/// Output of the topology stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyResult {
    pub total_cells: usize,
    pub groups: Vec<TopologyGroup>,
    pub cell_assignments: Vec<CellAssignment>,
    pub unassigned_cells: Vec<CellId>,
    pub strategy: ClusteringStrategy,
    /// Distance threshold the dendrogram was cut at, when cut by distance.
    pub threshold: Option<f64>,
}

impl TopologyResult {
    pub fn group(&self, id: GroupId) -> Option<&TopologyGroup> {
        self.groups.iter().find(|g| g.group_id == id)
    }

    /// Group containing `cell`, if assigned.
    pub fn group_of(&self, cell: CellId) -> Option<GroupId> {
        self.cell_assignments
            .iter()
            .find(|a| a.cell_id == cell)
            .map(|a| a.group_id)
    }
}
