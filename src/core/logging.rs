//! Logging initialization and cookie configuration checks
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Cookie file validation and logging at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;
use std::path::Path;

/// Initialize logger for both console and file output
///
/// The console only gets warnings (info with `verbose`) so that log lines do
/// not drown the interactive prompts; the file gets everything from info up.
///
/// # Arguments
/// * `log_file_path` - Path to the log file
/// * `verbose` - Lower both thresholds by one level
pub fn init_logger(log_file_path: &str, verbose: bool) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    let (term_level, file_level) = if verbose {
        (LevelFilter::Info, LevelFilter::Debug)
    } else {
        (LevelFilter::Warn, LevelFilter::Info)
    };

    CombinedLogger::init(vec![
        TermLogger::new(term_level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(file_level, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs which cookie file (if any) will be handed to yt-dlp
pub fn log_cookies_configuration(cookies: Option<&Path>) {
    match cookies {
        Some(path) => match path.canonicalize() {
            Ok(abs_path) => {
                log::info!("YTDL cookies: {}", abs_path.display());
                log::info!("   File exists and will be used for YouTube authentication");
            }
            Err(_) => {
                log::warn!("YTDL cookies: {} (exists but cannot canonicalize)", path.display());
            }
        },
        None => {
            log::info!("YTDL cookies: not configured");
            log::info!("   Age-restricted or members-only videos may fail to list");
        }
    }
}
