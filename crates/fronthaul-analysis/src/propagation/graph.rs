//! Directed event graph over groups, built on `petgraph`.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction as EdgeDirection;

use fronthaul_core::types::{FxHashMap, GroupId};

use super::types::{GraphEdge, GraphNode, NetworkGraph, NodeRole, PropagationEvent};
use crate::topology::TopologyGroup;

/// Edge weight: one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventEdge {
    pub delay_ms: f64,
    pub strength: f64,
}

/// Groups as nodes (in group order), events as edges.
pub struct PropagationGraph {
    pub graph: DiGraph<GroupId, EventEdge>,
    index: FxHashMap<GroupId, NodeIndex>,
}

impl PropagationGraph {
    pub fn build(groups: &[TopologyGroup], events: &[PropagationEvent]) -> Self {
        let mut graph = DiGraph::with_capacity(groups.len(), events.len());
        let mut index = FxHashMap::default();
        for group in groups {
            index.insert(group.group_id, graph.add_node(group.group_id));
        }
        for event in events {
            let (Some(&s), Some(&t)) = (index.get(&event.source_group), index.get(&event.target_group))
            else {
                continue;
            };
            graph.add_edge(
                s,
                t,
                EventEdge {
                    delay_ms: event.delay_ms,
                    strength: event.correlation.abs(),
                },
            );
        }
        Self { graph, index }
    }

    pub fn node(&self, group: GroupId) -> Option<NodeIndex> {
        self.index.get(&group).copied()
    }

    /// Role of a node from its in/out degree.
    pub fn role(&self, node: NodeIndex) -> NodeRole {
        let has_out = self
            .graph
            .neighbors_directed(node, EdgeDirection::Outgoing)
            .next()
            .is_some();
        let has_in = self
            .graph
            .neighbors_directed(node, EdgeDirection::Incoming)
            .next()
            .is_some();
        match (has_out, has_in) {
            (true, true) => NodeRole::Intermediate,
            (true, false) => NodeRole::Source,
            (false, true) => NodeRole::Target,
            (false, false) => NodeRole::Isolated,
        }
    }

    /// Strongest outgoing edge of `node` whose target satisfies `allow`;
    /// ties go to the lower target group.
    pub fn strongest_next(
        &self,
        node: NodeIndex,
        allow: impl Fn(NodeIndex) -> bool,
    ) -> Option<(NodeIndex, EventEdge)> {
        let mut best: Option<(NodeIndex, EventEdge)> = None;
        for edge in self.graph.edges(node) {
            let target = edge.target();
            if !allow(target) {
                continue;
            }
            let w = *edge.weight();
            let better = match best {
                None => true,
                Some((b, bw)) => {
                    w.strength > bw.strength
                        || (w.strength == bw.strength && self.graph[target] < self.graph[b])
                }
            };
            if better {
                best = Some((target, w));
            }
        }
        best
    }

    /// Serializable view with member counts.
    pub fn to_network_graph(&self, groups: &[TopologyGroup]) -> NetworkGraph {
        let nodes = groups
            .iter()
            .filter_map(|g| {
                self.node(g.group_id).map(|idx| GraphNode {
                    id: g.group_id,
                    role: self.role(idx),
                    member_count: g.cells.len(),
                })
            })
            .collect();
        let edges = self
            .graph
            .edge_references()
            .map(|e| GraphEdge {
                source: self.graph[e.source()],
                target: self.graph[e.target()],
                delay_ms: e.weight().delay_ms,
                strength: e.weight().strength,
            })
            .collect();
        NetworkGraph { nodes, edges }
    }
}
