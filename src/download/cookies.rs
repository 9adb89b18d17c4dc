//! Cookie file handling for yt-dlp.
//!
//! The cookie file is optional. A path that does not exist is reported and
//! dropped; an existing file is always passed through, even when it does not
//! look like a Netscape cookie jar (yt-dlp gives the authoritative verdict).

use std::path::{Path, PathBuf};

/// Summary of a Netscape cookie file's contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookiesDiagnostic {
    pub has_header: bool,
    pub total_cookies: usize,
    pub youtube_cookies: usize,
    pub issues: Vec<String>,
}

impl CookiesDiagnostic {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Parse Netscape cookie file content and return diagnostics
pub fn diagnose_cookies_content(content: &str) -> CookiesDiagnostic {
    let mut diagnostic = CookiesDiagnostic {
        has_header: content.lines().any(|l| l.contains("Netscape HTTP Cookie File")),
        ..Default::default()
    };

    if !diagnostic.has_header {
        diagnostic
            .issues
            .push("missing '# Netscape HTTP Cookie File' header".to_string());
    }

    for line in content.lines().map(str::trim) {
        // `#HttpOnly_` prefixed rows are real cookies, other `#` lines are comments
        let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Netscape format: domain TAB flag TAB path TAB secure TAB expires TAB name TAB value
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() >= 7 {
            diagnostic.total_cookies += 1;
            if parts[0].contains("youtube.com") || parts[0].contains("google.com") {
                diagnostic.youtube_cookies += 1;
            }
        }
    }

    if diagnostic.total_cookies == 0 {
        diagnostic.issues.push("no cookie rows found".to_string());
    } else if diagnostic.youtube_cookies == 0 {
        diagnostic.issues.push("no youtube.com cookies found".to_string());
    }

    diagnostic
}

/// Resolves the user-supplied cookie path.
///
/// Empty input means "no cookies". `~` is expanded. A missing file is
/// warned about and yields `None` so the run proceeds without cookies.
pub fn resolve_cookie_file(input: Option<&str>) -> Option<PathBuf> {
    let raw = input.map(str::trim).filter(|s| !s.is_empty())?;
    let path = PathBuf::from(shellexpand::tilde(raw).into_owned());

    if !path.is_file() {
        log::warn!("Cookie file {} not found", path.display());
        println!("Warning: Cookie file {} not found, continuing without cookies", raw);
        return None;
    }

    log_cookie_file_diagnostics(&path);
    Some(path)
}

fn log_cookie_file_diagnostics(path: &Path) {
    match fs_err::read_to_string(path) {
        Ok(content) => {
            let diagnostic = diagnose_cookies_content(&content);
            if diagnostic.is_valid() {
                log::info!(
                    "Cookie file {}: {} cookies ({} for YouTube)",
                    path.display(),
                    diagnostic.total_cookies,
                    diagnostic.youtube_cookies
                );
            } else {
                for issue in &diagnostic.issues {
                    log::warn!("Cookie file {}: {}", path.display(), issue);
                }
            }
        }
        Err(e) => log::warn!("Cannot read cookie file: {}", e),
    }
}
