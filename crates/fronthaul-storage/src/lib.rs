//! # fronthaul-storage
//!
//! The result repository shared by pipeline stages: an id-keyed concurrent
//! map constructed once and passed by reference, plus the persisted batch
//! record and its state machine.

pub mod batch;
pub mod repository;

pub use batch::{BatchRecord, BatchStatus, Stage, StageRecord, StageState};
pub use repository::{ResultKind, ResultRepository, StoredResult};
