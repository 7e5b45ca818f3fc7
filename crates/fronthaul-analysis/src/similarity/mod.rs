//! SimilarityEngine: pairwise similarity over per-cell series.

pub mod engine;
pub mod matrix;

pub use engine::{compute_similarity, SimilarityParams};
pub use matrix::{DegeneratePair, SimilarityMatrix};
