//! Core utilities, configuration, and common functionality

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod process;
pub mod validation;

// Re-exports for convenience
pub use config::{Credentials, Settings};
pub use context::RunContext;
pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_cookies_configuration};
