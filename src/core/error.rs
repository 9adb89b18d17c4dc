use thiserror::Error;

use crate::core::validation::ValidationError;

/// Centralized error types for the application
///
/// Every operational failure of one run is mapped onto one of these variants.
/// `Extraction`, `Download` and `Upload` abort the current resource only; the
/// orchestrator decides whether the whole run stops. `Cleanup` is logged and
/// never surfaced as a run failure.
///
/// # Example
///
/// ```no_run
/// use ytrelay::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed user input, caught before any backend call
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The extraction backend could not list, describe or enumerate a resource
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The backend fetch/merge failed or produced no file
    #[error("Download error: {0}")]
    Download(String),

    /// Relay session or transmission failed
    #[error("Upload error: {0}")]
    Upload(String),

    /// Best-effort artifact removal failed
    #[error("Cleanup error: {0}")]
    Cleanup(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend output could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Short category name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Extraction(_) => "extraction",
            AppError::Download(_) => "download",
            AppError::Upload(_) => "upload",
            AppError::Cleanup(_) => "cleanup",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Json(_) => "json",
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_keeps_backend_message() {
        let err = AppError::Extraction("Video unavailable".into());
        assert_eq!(err.to_string(), "Extraction error: Video unavailable");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(AppError::Download(String::new()).kind(), "download");
        assert_eq!(AppError::Upload(String::new()).kind(), "upload");
        assert_eq!(AppError::Cleanup(String::new()).kind(), "cleanup");
        assert_eq!(AppError::Validation(ValidationError::EmptyInput).kind(), "validation");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
