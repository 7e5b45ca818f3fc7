//! # fronthaul-analysis
//!
//! The analytics engine: pairwise similarity over per-cell series, topology
//! inference by clustering, per-cell robust anomaly detection, and
//! cross-group propagation analysis.
//!
//! Every stage is synchronous, pure numeric code over immutable inputs.

pub mod anomaly;
pub mod propagation;
pub mod similarity;
pub mod stats;
pub mod topology;

pub use anomaly::{
    detect_anomalies, score_peer_fit, AnomalyParams, AnomalyResult, PeerFitResult,
};
pub use propagation::{analyze_propagation, PropagationParams, PropagationResult};
pub use similarity::{compute_similarity, SimilarityMatrix, SimilarityParams};
pub use topology::{infer_topology, TopologyParams, TopologyResult};
