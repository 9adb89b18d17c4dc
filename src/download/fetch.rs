//! Fetcher: retrieves the chosen variants into one container file and
//! locates the thumbnail written next to it.

use crate::core::error::AppError;
use crate::core::validation::ensure_resource_url;
use crate::download::backend::{ExtractionBackend, FetchRequest};
use crate::download::cleanup::{cleanup_stem, sibling, THUMBNAIL_EXTENSIONS};
use crate::download::types::{ContainerKind, DownloadResult, FormatSelection};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static VIDEO_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[?&]v=|youtu\.be/|/shorts/|/live/|/embed/)([\w-]+)").expect("video id pattern is valid")
});

const MAX_STEM_LEN: usize = 80;

/// Base file name for the artifacts of `url`: the video id when the URL
/// carries one, otherwise the URL with every other character replaced by `_`.
pub fn stem_name_for(url: &str) -> String {
    if let Some(id) = VIDEO_ID.captures(url).and_then(|c| c.get(1)) {
        return id.as_str().to_string();
    }
    let trimmed = url.split_once("://").map_or(url, |(_, rest)| rest);
    trimmed
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .take(MAX_STEM_LEN)
        .collect()
}

/// First existing `<stem>.<ext>` over the thumbnail candidates, if any
pub fn find_thumbnail(stem: &Path) -> Option<PathBuf> {
    THUMBNAIL_EXTENSIONS
        .iter()
        .map(|ext| sibling(stem, ext))
        .find(|candidate| candidate.is_file())
}

/// Downloads `selection` from `url` into `output_dir` as a `container` file.
///
/// Every artifact is named `<output_dir>/<stem>.*` with the stem fixed
/// up front, so a failed fetch can remove what the backend left behind.
/// The produced file is verified on disk; when it is missing, the stem's
/// remnants are removed and a `Download` error is returned.
pub async fn fetch(
    backend: &dyn ExtractionBackend,
    url: &str,
    selection: &FormatSelection,
    container: ContainerKind,
    output_dir: &Path,
) -> Result<DownloadResult, AppError> {
    ensure_resource_url(url)?;

    let request = FetchRequest {
        url: url.to_string(),
        selection: selection.clone(),
        container,
        output_dir: output_dir.to_path_buf(),
        stem_name: stem_name_for(url),
    };
    let stem = request.output_stem();
    log::info!(
        "Fetching {} [{}] as {} into {}",
        url,
        selection.spec(),
        container,
        stem.display()
    );

    let media = match backend.fetch(&request).await {
        Ok(media) => media,
        Err(e) => {
            let report = cleanup_stem(&stem);
            log::warn!(
                "Fetch of {} failed, removed {} partial file(s)",
                url,
                report.removed.len()
            );
            return Err(e);
        }
    };
    let video_path = sibling(&stem, container.extension());

    if !video_path.is_file() {
        log::error!("Expected output file is missing: {}", video_path.display());
        cleanup_stem(&stem);
        return Err(AppError::Download(format!(
            "Downloaded file not found: {}",
            video_path.display()
        )));
    }

    let thumbnail_path = find_thumbnail(&stem);
    if thumbnail_path.is_none() {
        log::info!("No thumbnail found next to {}", video_path.display());
    }

    let title = media
        .title
        .clone()
        .unwrap_or_else(|| request.stem_name.clone());

    let result = DownloadResult {
        video_path,
        thumbnail_path,
        title,
        duration: media.duration.map(|d| d.max(0.0) as u64).unwrap_or(0),
        width: media.width,
        height: media.height,
        container,
    };
    log::info!("Downloaded '{}' to {}", result.title, result.video_path.display());
    Ok(result)
}
