//! Greedy propagation chains.

use fronthaul_core::types::FxHashSet;

use super::graph::PropagationGraph;
use super::types::PropagationPath;

/// Chains longer than this many groups are reported.
const MIN_PATH_GROUPS: usize = 3;

/// From every group with an outgoing edge, in group order, follow the
/// strongest edge to a group not yet on the chain.
pub fn build_paths(graph: &PropagationGraph) -> Vec<PropagationPath> {
    let mut paths = Vec::new();
    for start in graph.graph.node_indices() {
        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut sequence = vec![graph.graph[start]];
        let mut total_delay_ms = 0.0;
        let mut strengths = Vec::new();

        let mut current = start;
        while let Some((next, edge)) = graph.strongest_next(current, |n| !visited.contains(&n)) {
            visited.insert(next);
            sequence.push(graph.graph[next]);
            total_delay_ms += edge.delay_ms;
            strengths.push(edge.strength);
            current = next;
        }

        if sequence.len() >= MIN_PATH_GROUPS {
            paths.push(PropagationPath {
                path_id: format!("path_{:03}", paths.len() + 1),
                sequence,
                total_delay_ms,
                strength: crate::stats::mean(&strengths),
            });
        }
    }
    paths
}
