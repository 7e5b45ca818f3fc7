//! Error handling for Fronthaul.
//! One error enum per subsystem, `thiserror` only.

pub mod analysis_error;
pub mod config_error;
pub mod error_code;
pub mod input_error;
pub mod pipeline_error;
pub mod storage_error;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use error_code::{ErrorClass, FronthaulErrorCode};
pub use input_error::InputError;
pub use pipeline_error::PipelineError;
pub use storage_error::StorageError;
