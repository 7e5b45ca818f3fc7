//! AnomalyDetector: per-cell robust anomaly detection against a rolling
//! baseline, plus peer-fit scoring against topology groups.

pub mod congestion;
pub mod detector;
pub mod peer_fit;
pub mod rules;
pub mod types;

pub use congestion::derive_congestion;
pub use detector::detect_anomalies;
pub use peer_fit::{score_peer_fit, PeerFitResult, PeerFitScore};
pub use rules::{AnomalyRule, SlotVerdict};
pub use types::{
    AnomalyParams, AnomalyRecord, AnomalyResult, AnomalyStatistics, CellAnomalySummary, Severity,
};
