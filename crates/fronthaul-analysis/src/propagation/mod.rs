//! PropagationAnalyzer: how congestion moves between and within groups.

pub mod analyzer;
pub mod events;
pub mod graph;
pub mod leaders;
pub mod members;
pub mod paths;
pub mod signals;
pub mod types;
pub mod xcorr;

pub use analyzer::analyze_propagation;
pub use signals::{group_signals, GroupSignal};
pub use types::{
    Direction, GraphEdge, GraphNode, GroupLeader, LeadCount, MemberLag, NetworkGraph, NodeRole,
    PropagationEvent, PropagationParams, PropagationPath, PropagationResult,
};
pub use xcorr::{best_lag, correlation_p_value, xcorr, LagEstimate};
