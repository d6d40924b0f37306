//! Error types for the CAM tools crate.

use pancakekit_settings::SettingsError;
use std::io;
use thiserror::Error;

/// Errors that can occur while rendering a layer to a script.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// The render configuration failed validation.
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(#[from] SettingsError),

    /// The script could not be written.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

impl From<CamToolError> for pancakekit_core::Error {
    fn from(err: CamToolError) -> Self {
        match err {
            CamToolError::InvalidConfig(e) => e.into(),
            CamToolError::IoError(e) => pancakekit_core::Error::Io(e),
        }
    }
}
