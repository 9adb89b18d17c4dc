//! Scripted extraction backend
//!
//! Serves canned listings for registered URLs and "downloads" by writing
//! small files (container, PNG thumbnail, info sidecar) under the request's
//! output stem, the way yt-dlp lays them out.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use ytrelay::download::backend::{
    ExtractMode, ExtractionBackend, FetchRequest, FetchedMedia, InfoQuery, RawEntry, RawFormat, RawInfo,
};
use ytrelay::AppError;

const MB: f64 = 1024.0 * 1024.0;

/// One listed format of a mock resource
#[derive(Debug, Clone)]
pub struct MockFormat {
    pub id: &'static str,
    pub video: bool,
    pub size_mb: f64,
}

impl MockFormat {
    pub fn video(id: &'static str, size_mb: f64) -> Self {
        Self { id, video: true, size_mb }
    }

    pub fn audio(id: &'static str, size_mb: f64) -> Self {
        Self {
            id,
            video: false,
            size_mb,
        }
    }

    fn raw(&self) -> RawFormat {
        let (vcodec, acodec, ext) = if self.video {
            ("avc1.640028", "none", "mp4")
        } else {
            ("none", "mp4a.40.2", "m4a")
        };
        RawFormat {
            format_id: self.id.to_string(),
            ext: Some(ext.to_string()),
            vcodec: Some(vcodec.to_string()),
            acodec: Some(acodec.to_string()),
            height: self.video.then_some(1080),
            abr: (!self.video).then_some(129.5),
            filesize: Some(self.size_mb * MB),
            ..Default::default()
        }
    }
}

/// A single mock video
#[derive(Debug, Clone)]
pub struct MockResource {
    pub title: String,
    pub duration: f64,
    pub formats: Vec<MockFormat>,
}

impl MockResource {
    pub fn new(title: &str, formats: Vec<MockFormat>) -> Self {
        Self {
            title: title.to_string(),
            duration: 213.0,
            formats,
        }
    }
}

#[derive(Default)]
pub struct MockExtractor {
    resources: HashMap<String, MockResource>,
    playlists: HashMap<String, Vec<String>>,
    fail_fetch: HashSet<String>,
    interrupted: HashSet<String>,
    fail_estimate: HashSet<String>,
    no_output: HashSet<String>,
    /// URLs passed to `fetch`, in call order
    pub fetched: Mutex<Vec<String>>,
    /// Number of `extract_info` calls
    pub info_calls: Mutex<usize>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, url: &str, resource: MockResource) -> Self {
        self.resources.insert(url.to_string(), resource);
        self
    }

    pub fn with_playlist(mut self, url: &str, members: &[&str]) -> Self {
        self.playlists
            .insert(url.to_string(), members.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn failing_fetch(mut self, url: &str) -> Self {
        self.fail_fetch.insert(url.to_string());
        self
    }

    /// `fetch` writes a thumbnail and a `.part` file, then fails like an
    /// interrupted yt-dlp transfer
    pub fn interrupted_fetch(mut self, url: &str) -> Self {
        self.interrupted.insert(url.to_string());
        self
    }

    pub fn failing_estimate(mut self, url: &str) -> Self {
        self.fail_estimate.insert(url.to_string());
        self
    }

    /// `fetch` reports success but writes no container file
    pub fn without_output(mut self, url: &str) -> Self {
        self.no_output.insert(url.to_string());
        self
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn info_call_count(&self) -> usize {
        *self.info_calls.lock().unwrap()
    }

    fn resource(&self, url: &str) -> Result<&MockResource, AppError> {
        self.resources
            .get(url)
            .ok_or_else(|| AppError::Extraction(format!("[youtube] {}: Video unavailable", url)))
    }
}

fn write_png(path: &Path) {
    image::RgbImage::from_pixel(64, 36, image::Rgb([10, 120, 200]))
        .save(path)
        .unwrap();
}

#[async_trait]
impl ExtractionBackend for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract_info(&self, url: &str, query: &InfoQuery) -> Result<RawInfo, AppError> {
        *self.info_calls.lock().unwrap() += 1;

        if query.mode == ExtractMode::Flat {
            return match self.playlists.get(url) {
                Some(members) => Ok(RawInfo {
                    title: Some("Mock playlist".into()),
                    entries: members
                        .iter()
                        .map(|m| {
                            Some(RawEntry {
                                url: Some(m.clone()),
                                id: None,
                                title: self.resources.get(m).map(|r| r.title.clone()),
                            })
                        })
                        .collect(),
                    ..Default::default()
                }),
                None => self.resource(url).map(|_| RawInfo::default()),
            };
        }

        let resource = self.resource(url)?;
        match query.format {
            Some(ref spec) => {
                if self.fail_estimate.contains(url) {
                    return Err(AppError::Extraction("Requested format is not available".into()));
                }
                let requested = spec
                    .split('+')
                    .filter_map(|id| resource.formats.iter().find(|f| f.id == id))
                    .map(MockFormat::raw)
                    .collect();
                Ok(RawInfo {
                    title: Some(resource.title.clone()),
                    requested_formats: requested,
                    ..Default::default()
                })
            }
            None => Ok(RawInfo {
                title: Some(resource.title.clone()),
                duration: Some(resource.duration),
                thumbnail: Some("https://i.ytimg.com/vi/mock/maxresdefault.webp".into()),
                formats: resource.formats.iter().map(MockFormat::raw).collect(),
                ..Default::default()
            }),
        }
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedMedia, AppError> {
        self.fetched.lock().unwrap().push(request.url.clone());

        if self.fail_fetch.contains(&request.url) {
            return Err(AppError::Download("HTTP Error 403: Forbidden".into()));
        }
        let resource = self.resource(&request.url)?;
        let named = |ext: &str| request.output_dir.join(format!("{}.{}", request.stem_name, ext));

        if self.interrupted.contains(&request.url) {
            fs_err::write(named("webp"), b"RIFF\x00\x00\x00\x00WEBP").unwrap();
            fs_err::write(named("f137.mp4.part"), b"\x00\x00\x00\x18ftyp").unwrap();
            return Err(AppError::Download("HTTP Error 403: Forbidden".into()));
        }

        let video_path = named(request.container.extension());
        if !self.no_output.contains(&request.url) {
            fs_err::write(&video_path, b"\x00\x00\x00\x18ftypmp42").unwrap();
        }
        write_png(&named("png"));
        fs_err::write(named("info.json"), b"{}").unwrap();

        Ok(FetchedMedia {
            filepath: Some(video_path),
            title: Some(resource.title.clone()),
            duration: Some(resource.duration),
            width: Some(1920),
            height: Some(1080),
        })
    }
}
