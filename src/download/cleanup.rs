//! Removal of the local artifacts of one run.
//!
//! Deletion is best-effort and idempotent: absent files are skipped, and a
//! failure on one file is logged without stopping the others.

use crate::core::error::AppError;
use crate::download::types::DownloadResult;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Thumbnail extensions checked after a fetch, in priority order
pub const THUMBNAIL_EXTENSIONS: [&str; 3] = ["webp", "jpg", "png"];

/// Path without its last extension (`a/My.Clip.mp4` → `a/My.Clip`)
pub fn stem_path(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// `stem` + `.` + `ext`, keeping any dots already in the stem
pub fn sibling(stem: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// What one cleanup pass did
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn remove(&mut self, path: &Path) {
        if self.removed.iter().any(|p| p == path) {
            return;
        }
        match fs_err::remove_file(path) {
            Ok(()) => {
                log::debug!("Removed {}", path.display());
                self.removed.push(path.to_path_buf());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                let err = AppError::Cleanup(e.to_string());
                log::error!("{}", err);
                self.failed.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    /// Removes every file named `<stem>.*`: thumbnail remnants, sidecars and
    /// the backend's `.fNNN.<ext>` / `.part` intermediates.
    fn remove_remnants(&mut self, stem: &Path) {
        let Some(name) = stem.file_name() else {
            return;
        };
        let prefix = format!("{}.", name.to_string_lossy());
        let dir = match stem.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let entries = match fs_err::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return,
            Err(e) => {
                let err = AppError::Cleanup(e.to_string());
                log::error!("{}", err);
                self.failed.push((dir.to_path_buf(), e.to_string()));
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if entry.file_name().to_string_lossy().starts_with(&prefix) && path.is_file() {
                self.remove(&path);
            }
        }
    }
}

/// Removes the container, the (possibly converted) thumbnail and every `<stem>.*` remnant.
pub fn cleanup(result: &DownloadResult) -> CleanupReport {
    let mut report = CleanupReport::default();

    report.remove(&result.video_path);
    if let Some(ref thumbnail) = result.thumbnail_path {
        report.remove(thumbnail);
    }
    report.remove_remnants(&stem_path(&result.video_path));

    log::info!(
        "Cleanup of '{}': {} removed, {} failed",
        result.title,
        report.removed.len(),
        report.failed.len()
    );
    report
}

/// Removes the `<stem>.*` remnants of a fetch that produced no `DownloadResult`.
pub fn cleanup_stem(stem: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();
    report.remove_remnants(stem);
    report
}

/// Owns a `DownloadResult` and cleans its artifacts up when dropped.
///
/// Upload failures, early returns and `?` all pass through `Drop`, so the
/// artifacts of a produced download never outlive the iteration.
#[derive(Debug)]
pub struct ArtifactGuard {
    result: DownloadResult,
}

impl ArtifactGuard {
    pub fn new(result: DownloadResult) -> Self {
        Self { result }
    }

    pub fn result(&self) -> &DownloadResult {
        &self.result
    }

    pub fn result_mut(&mut self) -> &mut DownloadResult {
        &mut self.result
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        println!("Cleaning up...");
        cleanup(&self.result);
    }
}
