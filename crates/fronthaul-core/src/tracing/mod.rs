//! Observability for Fronthaul.
//! `tracing` crate with `EnvFilter`, per-crate log levels.

pub mod fields;
pub mod setup;

pub use setup::{init_tracing, LOG_ENV};
