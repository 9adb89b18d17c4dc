//! Extraction backend abstraction.
//!
//! Every network-facing yt-dlp call goes through the `ExtractionBackend`
//! trait so the listing, estimation, playlist and fetch stages can be driven
//! by a scripted backend in tests. `YtDlpBackend` is the real implementation:
//! it shells out to the yt-dlp executable and decodes its JSON output.

use crate::core::error::AppError;
use crate::core::process::{run_captured, summarize_stderr};
use crate::download::cleanup::sibling;
use crate::download::types::{ContainerKind, FormatSelection};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of yt-dlp's `formats` / `requested_formats` arrays
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    #[serde(default, deserialize_with = "null_as_default")]
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub abr: Option<f64>,
    #[serde(default)]
    pub filesize: Option<f64>,
    #[serde(default)]
    pub filesize_approx: Option<f64>,
}

impl RawFormat {
    /// Declared size, else approximate size, in bytes
    pub fn best_size_bytes(&self) -> Option<f64> {
        self.filesize.or(self.filesize_approx)
    }
}

/// Member of a flat playlist listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Subset of yt-dlp's `--dump-single-json` document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub formats: Vec<RawFormat>,
    /// Present when a `-f a+b` spec resolved to several formats
    #[serde(default, deserialize_with = "null_as_default")]
    pub requested_formats: Vec<RawFormat>,
    #[serde(default)]
    pub filesize: Option<f64>,
    #[serde(default)]
    pub filesize_approx: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries: Vec<Option<RawEntry>>,
}

/// How much yt-dlp should resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Full metadata of a single resource
    Full,
    /// Enumerate collection members without resolving their formats
    Flat,
}

/// Parameters of one metadata query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoQuery {
    pub mode: ExtractMode,
    /// Restrict the query to this format spec
    pub format: Option<String>,
}

impl InfoQuery {
    pub fn full() -> Self {
        Self {
            mode: ExtractMode::Full,
            format: None,
        }
    }

    pub fn flat() -> Self {
        Self {
            mode: ExtractMode::Flat,
            format: None,
        }
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            mode: ExtractMode::Full,
            format: Some(format.into()),
        }
    }
}

/// Parameters of one fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub url: String,
    pub selection: FormatSelection,
    pub container: ContainerKind,
    pub output_dir: PathBuf,
    /// File name every artifact of this fetch starts with
    pub stem_name: String,
}

impl FetchRequest {
    /// `<output_dir>/<stem_name>`, known before the backend runs
    pub fn output_stem(&self) -> PathBuf {
        self.output_dir.join(&self.stem_name)
    }
}

/// What the backend reports after a fetch
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FetchedMedia {
    #[serde(default)]
    pub filepath: Option<PathBuf>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Trait for extraction backend implementations.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Human-readable name of this backend (e.g. "yt-dlp")
    fn name(&self) -> &str;

    /// Resolve metadata for `url` without downloading.
    async fn extract_info(&self, url: &str, query: &InfoQuery) -> Result<RawInfo, AppError>;

    /// Retrieve (and mux, when two ids are given) the selection into `request.container`.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedMedia, AppError>;
}

/// Extension field of the output template; the base name is fixed by the request
const OUTPUT_EXT_FIELD: &str = "%(ext)s";

/// Printed once the file reached its final name
const AFTER_MOVE_PRINT: &str = "after_move:%(.{filepath,title,duration,width,height})j";

/// Extraction backend powered by the yt-dlp executable
#[derive(Debug, Clone)]
pub struct YtDlpBackend {
    bin: String,
    cookies: Option<PathBuf>,
}

impl YtDlpBackend {
    pub fn new(bin: impl Into<String>, cookies: Option<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            cookies,
        }
    }

    fn push_cookies_args(&self, args: &mut Vec<String>) {
        if let Some(ref cookies) = self.cookies {
            args.push("--cookies".to_string());
            args.push(cookies.to_string_lossy().into_owned());
        }
    }

    /// Arguments for a metadata query
    pub fn info_args(&self, url: &str, query: &InfoQuery) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        match query.mode {
            ExtractMode::Full => {
                args.extend(["--dump-single-json", "--no-playlist"].map(String::from));
            }
            ExtractMode::Flat => {
                args.extend(["--flat-playlist", "--dump-single-json"].map(String::from));
            }
        }
        args.push("--no-warnings".to_string());
        if let Some(ref format) = query.format {
            args.push("-f".to_string());
            args.push(format.clone());
        }
        self.push_cookies_args(&mut args);
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    /// Arguments for a fetch
    ///
    /// `--recode-video` makes the backend produce the requested container even
    /// when a single (non-merged) format was selected; it is a no-op when the
    /// merged file already has that extension.
    pub fn fetch_args(&self, request: &FetchRequest) -> Vec<String> {
        let container = request.container.extension();
        let template = sibling(&request.output_stem(), OUTPUT_EXT_FIELD);

        let mut args: Vec<String> = vec![
            "-f".to_string(),
            request.selection.spec(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            "--write-thumbnail".to_string(),
            "--merge-output-format".to_string(),
            container.to_string(),
            "--recode-video".to_string(),
            container.to_string(),
            "--no-playlist".to_string(),
            "--print".to_string(),
            AFTER_MOVE_PRINT.to_string(),
        ];
        self.push_cookies_args(&mut args);
        args.push("--".to_string());
        args.push(request.url.clone());
        args
    }
}

/// Finds the JSON object printed by `--print after_move:...`
///
/// Anything else yt-dlp writes to stdout is skipped; the last parseable line wins.
pub fn parse_fetch_output(stdout: &str) -> Option<FetchedMedia> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .filter(|l| l.starts_with('{'))
        .find_map(|l| serde_json::from_str::<FetchedMedia>(l).ok())
}

#[async_trait]
impl ExtractionBackend for YtDlpBackend {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn extract_info(&self, url: &str, query: &InfoQuery) -> Result<RawInfo, AppError> {
        let args = self.info_args(url, query);
        log::debug!("{} {}", self.bin, args.join(" "));

        let mut cmd = Command::new(&self.bin);
        cmd.args(&args).stdout(Stdio::piped()).stderr(Stdio::piped());
        let output = run_captured(&mut cmd, &self.bin)
            .await
            .map_err(|e| AppError::Extraction(e.to_string()))?;

        if !output.status.success() {
            let message = summarize_stderr(&output.stderr);
            log::error!("yt-dlp metadata query failed for {}: {}", url, message);
            return Err(AppError::Extraction(message));
        }

        serde_json::from_slice::<RawInfo>(&output.stdout)
            .map_err(|e| AppError::Extraction(format!("Unreadable yt-dlp output: {}", e)))
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedMedia, AppError> {
        let args = self.fetch_args(request);
        log::info!("{} {}", self.bin, args.join(" "));

        let mut cmd = Command::new(&self.bin);
        cmd.args(&args).stdout(Stdio::piped()).stderr(Stdio::piped());
        let output = run_captured(&mut cmd, &self.bin)
            .await
            .map_err(|e| AppError::Download(e.to_string()))?;

        if !output.status.success() {
            let message = summarize_stderr(&output.stderr);
            log::error!("Download failed for {}: {}", request.url, message);
            return Err(AppError::Download(message));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_fetch_output(&stdout)
            .ok_or_else(|| AppError::Download("yt-dlp did not report the downloaded file".to_string()))
    }
}
