//! Input validation errors.

use super::error_code::{self, ErrorClass, FronthaulErrorCode};

/// Errors raised while validating caller-supplied data.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("No records provided")]
    Empty,

    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Record for cell {cell_id} at slot {slot_id} carries no signal column")]
    NoSignal { cell_id: i64, slot_id: i64 },

    #[error("Duplicate record for cell {cell_id} at slot {slot_id}")]
    DuplicateSlot { cell_id: i64, slot_id: i64 },

    #[error("Column {column} must be 0 or 1, got {value} (cell {cell_id}, slot {slot_id})")]
    NonBinary {
        column: String,
        cell_id: i64,
        slot_id: i64,
        value: i64,
    },

    #[error("Column {column} must be finite (cell {cell_id}, slot {slot_id})")]
    NonFinite {
        column: String,
        cell_id: i64,
        slot_id: i64,
    },

    #[error("Invalid cell id: {0}")]
    InvalidCellId(String),

    #[error("Invalid group id: {0}")]
    InvalidGroupId(String),

    #[error("Invalid similarity matrix: {0}")]
    InvalidMatrix(String),

    #[error("Malformed input: {0}")]
    Malformed(String),
}

impl FronthaulErrorCode for InputError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingColumn { .. } => error_code::MISSING_COLUMN,
            Self::InvalidMatrix(_) => error_code::INVALID_MATRIX,
            _ => error_code::INPUT_ERROR,
        }
    }

    fn error_class(&self) -> ErrorClass {
        ErrorClass::Rejected
    }
}
