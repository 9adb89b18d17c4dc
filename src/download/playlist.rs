//! Playlist expansion for batch runs.
//!
//! Uses yt-dlp's flat mode, so members are enumerated without resolving
//! their own formats.

use crate::core::error::AppError;
use crate::download::backend::{ExtractionBackend, InfoQuery, RawEntry, RawInfo};
use crate::download::types::PlaylistEntry;

/// Builds a member's URL, falling back to the watch URL built from its id
fn entry_url(entry: &RawEntry) -> Option<String> {
    entry
        .url
        .clone()
        .filter(|u| !u.is_empty())
        .or_else(|| entry.id.as_ref().map(|id| format!("https://www.youtube.com/watch?v={}", id)))
}

/// Converts a flat listing into ordered entries; members without an address are dropped.
pub fn entries_from_info(info: &RawInfo) -> Vec<PlaylistEntry> {
    info.entries
        .iter()
        .flatten()
        .filter_map(|entry| {
            let url = entry_url(entry)?;
            Some((entry, url))
        })
        .enumerate()
        .map(|(pos, (entry, url))| PlaylistEntry {
            title: entry.title.clone().unwrap_or_else(|| format!("Video {}", pos + 1)),
            url,
        })
        .collect()
}

/// `true` only when the flat listing has more than one member.
///
/// Never fails: backend errors are logged and reported as `false`, so the
/// caller falls back to treating the URL as a single resource.
pub async fn is_collection(backend: &dyn ExtractionBackend, url: &str) -> bool {
    match backend.extract_info(url, &InfoQuery::flat()).await {
        Ok(info) => entries_from_info(&info).len() > 1,
        Err(e) => {
            log::warn!("Collection check failed for {}: {}", url, e);
            false
        }
    }
}

/// Lists the members of a collection in order.
pub async fn list_entries(backend: &dyn ExtractionBackend, url: &str) -> Result<Vec<PlaylistEntry>, AppError> {
    log::info!("Extracting playlist from: {}", url);

    let info = backend.extract_info(url, &InfoQuery::flat()).await?;
    let entries = entries_from_info(&info);

    if entries.is_empty() {
        return Err(AppError::Extraction("No videos found in playlist".to_string()));
    }

    log::info!(
        "Playlist '{}': {} entries",
        info.title.as_deref().unwrap_or("Playlist"),
        entries.len()
    );
    Ok(entries)
}
