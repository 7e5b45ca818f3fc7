//! # test-fixtures
//!
//! Deterministic synthetic telemetry for tests and benchmarks.
//! Same seed, same records, on every run.

pub mod rng;
pub mod scenarios;

pub use rng::SimpleRng;
pub use scenarios::{cascade, random_indicators, shared_link, CascadeScenario, SharedLinkScenario};
