// Central Error Type for the Application

use thiserror::Error;

use crate::domain::Platform;

/// Application-level error type
///
/// Per-task problems never surface here; they become `TaskOutcome::Failure`.
/// These are the conditions that stop a whole batch.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(Platform),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
