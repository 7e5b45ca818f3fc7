//! # fronthaul-pipeline
//!
//! Batch orchestration: validation, similarity and topology, anomaly
//! detection alongside them, then propagation. Every stage's output is
//! stored in the [`ResultRepository`](fronthaul_storage::ResultRepository)
//! before a dependent stage starts, and the batch record tracks progress.

pub mod pipeline;
pub mod plan;
pub mod request;

pub use pipeline::BatchPipeline;
pub use plan::{IndicatorPlan, SignalSource, StagePlan};
pub use request::BatchRequest;
