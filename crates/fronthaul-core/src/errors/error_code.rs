//! FronthaulErrorCode trait: stable error codes and caller-facing classes.

use serde::{Deserialize, Serialize};

/// How an error is surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The request itself is invalid and is rejected before any work starts.
    Rejected,
    /// An unexpected failure inside a stage; earlier results stay valid.
    Internal,
}

/// Every error enum implements this to expose a structured code string.
pub trait FronthaulErrorCode {
    /// Returns the error code string (e.g., "INPUT_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns how the error is surfaced to the caller.
    fn error_class(&self) -> ErrorClass;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const INPUT_ERROR: &str = "INPUT_ERROR";
pub const MISSING_COLUMN: &str = "MISSING_COLUMN";
pub const INVALID_MATRIX: &str = "INVALID_MATRIX";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const KIND_MISMATCH: &str = "KIND_MISMATCH";
pub const ANALYSIS_ERROR: &str = "ANALYSIS_ERROR";
pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
