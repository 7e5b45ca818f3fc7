//! Propagation analysis entry point.

use fronthaul_core::errors::AnalysisError;
use fronthaul_core::types::CellSeries;

use super::events::detect_events;
use super::graph::PropagationGraph;
use super::leaders::group_leaders;
use super::members::member_lags;
use super::paths::build_paths;
use super::signals::group_signals;
use super::types::{PropagationParams, PropagationResult};
use crate::topology::TopologyResult;

/// Analyze how indicator activity propagates between the groups of
/// `topology` and between members inside each group.
///
/// `indicators` holds one per-cell series (anomaly, congestion or loss
/// flags). Fewer than two groups yields no events, but member lags and
/// leaders are still computed.
pub fn analyze_propagation(
    topology: &TopologyResult,
    indicators: &[CellSeries],
    params: &PropagationParams,
) -> Result<PropagationResult, AnalysisError> {
    let groups = &topology.groups;
    let signals = group_signals(groups, indicators)?;
    let slots_analyzed = signals.iter().map(|s| s.len()).max().unwrap_or(0);

    let events = detect_events(&signals, params);
    let graph = PropagationGraph::build(groups, &events);
    let propagation_paths = build_paths(&graph);
    let network_graph = graph.to_network_graph(groups);
    let member_lags = member_lags(groups, indicators, params);
    let leaders = group_leaders(groups, indicators);

    tracing::info!(
        group_count = groups.len(),
        events = events.len(),
        paths = propagation_paths.len(),
        member_lags = member_lags.len(),
        "propagation analysis complete"
    );

    Ok(PropagationResult {
        events,
        propagation_paths,
        network_graph,
        member_lags,
        leaders,
        slots_analyzed,
    })
}
