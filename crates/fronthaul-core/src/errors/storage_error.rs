//! Result repository errors.

use super::error_code::{self, ErrorClass, FronthaulErrorCode};

/// Errors raised when looking up stored results.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Result {id} is a {actual}, expected {expected}")]
    KindMismatch {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FronthaulErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::KindMismatch { .. } => error_code::KIND_MISMATCH,
        }
    }

    fn error_class(&self) -> ErrorClass {
        ErrorClass::Rejected
    }
}
