//! Relay-specific error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while relaying a file over MTProto
#[derive(Error, Debug)]
pub enum RelayError {
    /// Grammers client invocation error
    #[error("MTProto client error: {0}")]
    Invocation(#[from] grammers_mtsender::InvocationError),

    /// Session-related errors (connect, load, save)
    #[error("Session error: {0}")]
    Session(String),

    /// Sign-in failed
    #[error("Sign-in failed: {0}")]
    SignIn(String),

    /// Destination channel could not be parsed or resolved
    #[error("Channel error: {0}")]
    Channel(String),

    /// The file to relay is gone
    #[error("Video file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RelayError> for crate::core::error::AppError {
    fn from(err: RelayError) -> Self {
        crate::core::error::AppError::Upload(err.to_string())
    }
}
