//! TopologyInferencer: cluster cells into shared-fronthaul groups.

pub mod dendrogram;
pub mod density;
pub mod inferencer;
pub mod kmeans;
pub mod types;

pub use dendrogram::{Dendrogram, Merge};
pub use inferencer::infer_topology;
pub use types::{CellAssignment, TopologyGroup, TopologyParams, TopologyResult};
