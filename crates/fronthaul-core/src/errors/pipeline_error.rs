//! Pipeline errors.

use super::error_code::{self, ErrorClass, FronthaulErrorCode};
use super::{AnalysisError, ConfigError, InputError, StorageError};

/// Errors that can occur during pipeline execution.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Batch {batch_id} cannot move from {from} to {to}")]
    InvalidTransition {
        batch_id: String,
        from: String,
        to: String,
    },
}

impl FronthaulErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Input(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Analysis(e) => e.error_code(),
            Self::InvalidTransition { .. } => error_code::INVALID_TRANSITION,
        }
    }

    fn error_class(&self) -> ErrorClass {
        match self {
            Self::Input(e) => e.error_class(),
            Self::Config(e) => e.error_class(),
            Self::Storage(e) => e.error_class(),
            Self::Analysis(e) => e.error_class(),
            Self::InvalidTransition { .. } => ErrorClass::Internal,
        }
    }
}
