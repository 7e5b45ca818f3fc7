//! # fronthaul-core
//!
//! Foundation crate for the Fronthaul topology engine.
//! Defines typed records, the ingestion table, errors, config, tracing,
//! and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod table;
pub mod tracing;
pub mod types;

pub use config::FronthaulConfig;
pub use errors::{ErrorClass, FronthaulErrorCode};
pub use table::{SlotRecord, SlotTable};
pub use types::{CellId, CellSeries, GroupId, SignalKind, SlotId};
