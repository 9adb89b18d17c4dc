//! Record types shared by the listing, fetch, relay and cleanup stages.

use std::fmt;
use std::path::PathBuf;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Bytes per megabyte used for every size shown to the user
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Output wrapper format requested for the merged file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ContainerKind {
    #[default]
    Mp4,
    Mkv,
    Webm,
}

impl ContainerKind {
    /// File extension produced for this container
    pub fn extension(&self) -> &'static str {
        match self {
            ContainerKind::Mp4 => "mp4",
            ContainerKind::Mkv => "mkv",
            ContainerKind::Webm => "webm",
        }
    }

    /// MIME type announced to the relay backend
    pub fn mime_type(&self) -> &'static str {
        match self {
            ContainerKind::Mp4 => "video/mp4",
            ContainerKind::Mkv => "video/x-matroska",
            ContainerKind::Webm => "video/webm",
        }
    }
}

/// One encoding variant of a resource, as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDescriptor {
    pub id: String,
    pub ext: String,
    pub height: Option<u32>,
    pub fps: Option<f64>,
    pub abr: Option<f64>,
    /// Declared size in MB, one decimal of precision; 0 when undeclared
    pub size_mb: f64,
    pub has_video: bool,
}

impl FormatDescriptor {
    pub fn video(id: &str, ext: &str, height: Option<u32>, fps: Option<f64>, size_mb: f64) -> Self {
        Self {
            id: id.to_string(),
            ext: ext.to_string(),
            height,
            fps,
            abr: None,
            size_mb,
            has_video: true,
        }
    }

    pub fn audio(id: &str, ext: &str, abr: Option<f64>, size_mb: f64) -> Self {
        Self {
            id: id.to_string(),
            ext: ext.to_string(),
            height: None,
            fps: None,
            abr,
            size_mb,
            has_video: false,
        }
    }

    /// Human-readable summary, e.g. `1080p@60fps (mp4, 50.0MB)` or `128kbps (m4a, 3.1MB)`
    pub fn summary(&self) -> String {
        if self.has_video {
            let fps = match self.fps {
                Some(fps) if fps > 0.0 => format!("@{}fps", fps),
                _ => String::new(),
            };
            format!(
                "{}p{} ({}, {:.1}MB)",
                self.height.unwrap_or(0),
                fps,
                self.ext,
                self.size_mb
            )
        } else {
            format!("{:.0}kbps ({}, {:.1}MB)", self.abr.unwrap_or(0.0), self.ext, self.size_mb)
        }
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.summary())
    }
}

/// Ordered id → descriptor mapping, in backend listing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatTable {
    entries: Vec<FormatDescriptor>,
}

impl FormatTable {
    /// Inserts a descriptor; a repeated id replaces the earlier one in place.
    pub fn insert(&mut self, descriptor: FormatDescriptor) {
        match self.entries.iter_mut().find(|d| d.id == descriptor.id) {
            Some(existing) => *existing = descriptor,
            None => self.entries.push(descriptor),
        }
    }

    pub fn get(&self, id: &str) -> Option<&FormatDescriptor> {
        self.entries.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatDescriptor> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of one listing query
#[derive(Debug, Clone, Default)]
pub struct ResourceInfo {
    pub title: String,
    /// Duration in seconds
    pub duration: u64,
    pub thumbnail: Option<String>,
    pub video_formats: FormatTable,
    pub audio_formats: FormatTable,
}

/// Chosen variant ids for one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSelection {
    pub video: String,
    pub audio: Option<String>,
}

impl FormatSelection {
    pub fn new(video: impl Into<String>, audio: Option<String>) -> Self {
        Self {
            video: video.into(),
            audio: audio.filter(|a| !a.is_empty()),
        }
    }

    /// Backend format spec: `video+audio` when both are set
    pub fn spec(&self) -> String {
        match &self.audio {
            Some(audio) => format!("{}+{}", self.video, audio),
            None => self.video.clone(),
        }
    }

    /// Requested ids, video first
    pub fn ids(&self) -> Vec<&str> {
        std::iter::once(self.video.as_str())
            .chain(self.audio.as_deref())
            .collect()
    }
}

/// Single member of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub title: String,
    pub url: String,
}

/// Artifacts of one completed fetch; owns the local files until cleanup
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadResult {
    pub video_path: PathBuf,
    pub thumbnail_path: Option<PathBuf>,
    pub title: String,
    /// Duration in seconds
    pub duration: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub container: ContainerKind,
}

/// Formats a duration as `m:ss` or `h:mm:ss`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
