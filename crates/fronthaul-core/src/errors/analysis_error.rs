//! Analysis errors: unexpected failures inside a stage.
//!
//! Numeric degeneracies (zero variance, too few overlapping slots, NaN
//! correlations) are never reported here; the stages substitute neutral
//! values instead.

use super::error_code::{self, ErrorClass, FronthaulErrorCode};

/// Errors raised by the analysis stages.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Not enough cells: need at least {required}, got {actual}")]
    NotEnoughCells { required: usize, actual: usize },

    #[error("Group {group_id} has no member with an indicator series")]
    EmptyGroup { group_id: String },

    #[error("Clustering failed: {0}")]
    Clustering(String),

    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },
}

impl FronthaulErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        error_code::ANALYSIS_ERROR
    }

    fn error_class(&self) -> ErrorClass {
        ErrorClass::Internal
    }
}
