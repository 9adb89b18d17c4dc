//! Format listing: classifies a resource's variants into video-capable and
//! audio-only groups.

use crate::core::error::AppError;
use crate::core::validation::ensure_resource_url;
use crate::download::backend::{ExtractionBackend, InfoQuery, RawFormat, RawInfo};
use crate::download::types::{FormatDescriptor, ResourceInfo, BYTES_PER_MB};

/// Title used when the backend reports none
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Codec values count as absent when missing or when yt-dlp reports `"none"`.
fn has_codec(codec: Option<&str>) -> bool {
    matches!(codec, Some(c) if !c.is_empty() && c != "none")
}

/// Declared size in MB rounded to one decimal; undeclared sizes are 0
fn declared_size_mb(format: &RawFormat) -> f64 {
    format
        .filesize
        .map(|bytes| (bytes / BYTES_PER_MB * 10.0).round() / 10.0)
        .unwrap_or(0.0)
}

/// Classifies raw variants. Variants with both tracks go to the video group only.
pub fn classify_formats(info: &RawInfo) -> ResourceInfo {
    let mut resource = ResourceInfo {
        title: info.title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        duration: info.duration.map(|d| d.max(0.0) as u64).unwrap_or(0),
        thumbnail: info.thumbnail.clone(),
        ..Default::default()
    };

    for format in info.formats.iter().filter(|f| !f.format_id.is_empty()) {
        let ext = format.ext.as_deref().unwrap_or("unknown");
        let has_video = has_codec(format.vcodec.as_deref());
        let has_audio = has_codec(format.acodec.as_deref());

        if has_video {
            resource.video_formats.insert(FormatDescriptor::video(
                &format.format_id,
                ext,
                format.height,
                format.fps,
                declared_size_mb(format),
            ));
        } else if has_audio {
            resource.audio_formats.insert(FormatDescriptor::audio(
                &format.format_id,
                ext,
                format.abr,
                declared_size_mb(format),
            ));
        }
    }

    resource
}

/// Lists the variants of `url`.
///
/// Fails with `Validation` before touching the backend when the URL is
/// malformed, and with `Extraction` carrying the backend's message otherwise.
pub async fn list_formats(backend: &dyn ExtractionBackend, url: &str) -> Result<ResourceInfo, AppError> {
    ensure_resource_url(url)?;

    log::info!("Listing formats for {} via {}", url, backend.name());
    let info = backend.extract_info(url, &InfoQuery::full()).await.map_err(|e| match e {
        AppError::Extraction(msg) => AppError::Extraction(format!("Failed to extract video info: {}", msg)),
        other => other,
    })?;

    let resource = classify_formats(&info);
    log::info!(
        "{}: {} video formats, {} audio-only formats",
        resource.title,
        resource.video_formats.len(),
        resource.audio_formats.len()
    );
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn format(id: &str, vcodec: Option<&str>, acodec: Option<&str>) -> RawFormat {
        RawFormat {
            format_id: id.to_string(),
            ext: Some("mp4".to_string()),
            vcodec: vcodec.map(String::from),
            acodec: acodec.map(String::from),
            height: Some(720),
            ..Default::default()
        }
    }

    fn info(formats: Vec<RawFormat>) -> RawInfo {
        RawInfo {
            title: Some("Clip".into()),
            duration: Some(61.7),
            formats,
            ..Default::default()
        }
    }

    #[test]
    fn test_video_only_variant_in_video_group() {
        let r = classify_formats(&info(vec![format("137", Some("avc1"), None)]));
        assert!(r.video_formats.contains("137"));
        assert!(!r.audio_formats.contains("137"));
    }

    #[test]
    fn test_audio_only_variant_in_audio_group() {
        let r = classify_formats(&info(vec![format("140", None, Some("mp4a"))]));
        assert!(r.audio_formats.contains("140"));
        assert!(!r.video_formats.contains("140"));

        let r = classify_formats(&info(vec![format("251", Some("none"), Some("opus"))]));
        assert!(r.audio_formats.contains("251"));
    }

    #[test]
    fn test_muxed_variant_only_in_video_group() {
        let r = classify_formats(&info(vec![format("22", Some("avc1"), Some("mp4a"))]));
        assert!(r.video_formats.contains("22"));
        assert!(!r.audio_formats.contains("22"));
    }

    #[test]
    fn test_codecless_variant_dropped() {
        let r = classify_formats(&info(vec![format("sb0", Some("none"), Some("none"))]));
        assert!(r.video_formats.is_empty());
        assert!(r.audio_formats.is_empty());
    }

    #[test]
    fn test_size_and_metadata() {
        let mut f = format("137", Some("avc1"), None);
        f.height = Some(1080);
        f.filesize = Some(52_428_800.0);
        let mut g = format("22", Some("avc1"), Some("mp4a"));
        g.filesize_approx = Some(10_000_000.0);

        let r = classify_formats(&info(vec![f, g]));
        assert_eq!(r.title, "Clip");
        assert_eq!(r.duration, 61);
        assert_eq!(r.video_formats.get("137").unwrap().summary(), "1080p (mp4, 50.0MB)");
        assert_eq!(r.video_formats.get("22").unwrap().size_mb, 0.0);
    }

    #[test]
    fn test_missing_title() {
        let r = classify_formats(&RawInfo::default());
        assert_eq!(r.title, UNKNOWN_TITLE);
        assert_eq!(r.duration, 0);
    }
}
