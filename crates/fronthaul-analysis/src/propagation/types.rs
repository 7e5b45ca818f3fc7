//! Propagation result types.

use serde::{Deserialize, Serialize};

use fronthaul_core::config::PropagationConfig;
use fronthaul_core::constants;
use fronthaul_core::types::{CellId, GroupId};

/// Parameters for [`super::analyze_propagation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationParams {
    pub max_lag: usize,
    pub min_correlation: f64,
    pub slot_duration_ms: f64,
    pub min_signal_length: usize,
    /// Guard added to the standard deviation when normalizing signals.
    pub epsilon: f64,
}

impl Default for PropagationParams {
    fn default() -> Self {
        Self::from(&PropagationConfig::default())
    }
}

impl From<&PropagationConfig> for PropagationParams {
    fn from(config: &PropagationConfig) -> Self {
        Self {
            max_lag: config.effective_max_lag(),
            min_correlation: config.effective_min_correlation(),
            slot_duration_ms: config.effective_slot_duration_ms(),
            min_signal_length: config.effective_min_signal_length(),
            epsilon: constants::NORMALIZE_EPSILON,
        }
    }
}

/// Which side of a pair leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The first of the pair leads.
    Downstream,
    /// The second of the pair leads.
    Upstream,
    /// Best alignment at zero lag.
    Simultaneous,
}

impl Direction {
    pub fn from_lag(lag: i64) -> Self {
        match lag.signum() {
            1 => Self::Downstream,
            -1 => Self::Upstream,
            _ => Self::Simultaneous,
        }
    }
}

/// A significant lagged correlation between two groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationEvent {
    pub event_id: String,
    pub source_group: GroupId,
    pub target_group: GroupId,
    /// Best lag, in slots, measured from the first group of the pair.
    pub lag_slots: i64,
    pub delay_ms: f64,
    pub correlation: f64,
    pub direction: Direction,
    pub confidence: f64,
    /// Two-sided p-value of the correlation at the best lag.
    pub p_value: f64,
}

/// A greedy chain of events through more than two groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationPath {
    pub path_id: String,
    pub sequence: Vec<GroupId>,
    pub total_delay_ms: f64,
    /// Mean |correlation| along the chain.
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Source,
    Intermediate,
    Target,
    Isolated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: GroupId,
    pub role: NodeRole,
    pub member_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: GroupId,
    pub target: GroupId,
    pub delay_ms: f64,
    pub strength: f64,
}

/// Groups as nodes, events as directed edges.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl NetworkGraph {
    pub fn node(&self, id: GroupId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Lagged correlation between two member cells of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberLag {
    pub group_id: GroupId,
    pub source_cell: CellId,
    pub target_cell: CellId,
    pub lag_slots: i64,
    pub delay_ms: f64,
    pub correlation: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadCount {
    pub cell_id: CellId,
    pub count: usize,
}

/// Coarse leader estimate: which member is active first most often when
/// several are active in the same slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLeader {
    pub group_id: GroupId,
    pub leader: Option<CellId>,
    /// Per member, ascending by cell id.
    pub lead_counts: Vec<LeadCount>,
    pub simultaneous_slots: usize,
}

/// Output of the propagation stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropagationResult {
    pub events: Vec<PropagationEvent>,
    pub propagation_paths: Vec<PropagationPath>,
    pub network_graph: NetworkGraph,
    pub member_lags: Vec<MemberLag>,
    pub leaders: Vec<GroupLeader>,
    pub slots_analyzed: usize,
}

impl PropagationResult {
    /// Whether any event has `group` at either end.
    pub fn involves(&self, group: GroupId) -> bool {
        self.events
            .iter()
            .any(|e| e.source_group == group || e.target_group == group)
    }
}
