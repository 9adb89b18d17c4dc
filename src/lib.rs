//! ytrelay - download YouTube videos with yt-dlp and relay them to a Telegram channel
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, validation and the per-run context
//! - `download`: format listing, size estimation, playlist expansion, fetch and cleanup
//! - `conversion`: thumbnail conversion strategies
//! - `telegram`: MTProto relay to the destination channel
//! - `orchestrator`: the interactive prompt flow

pub mod cli;
pub mod conversion;
pub mod core;
pub mod download;
pub mod orchestrator;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult, RunContext};
pub use orchestrator::{BatchSummary, Orchestrator, Prompter, RunOutcome, StdinPrompter};
