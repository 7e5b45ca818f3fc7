//! Configuration system for Fronthaul.
//! TOML-based, layered resolution: overrides > env > project file > defaults.

pub mod anomaly_config;
pub mod fronthaul_config;
pub mod pipeline_config;
pub mod propagation_config;
pub mod similarity_config;
pub mod topology_config;

pub use anomaly_config::AnomalyConfig;
pub use fronthaul_config::{ConfigOverrides, FronthaulConfig};
pub use pipeline_config::PipelineConfig;
pub use propagation_config::PropagationConfig;
pub use similarity_config::SimilarityConfig;
pub use topology_config::{CutRule, TopologyConfig};
