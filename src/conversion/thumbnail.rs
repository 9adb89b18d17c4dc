//! Thumbnail conversion to JPEG.
//!
//! Conversion is an ordered list of strategies. Each one is checked for
//! availability, then tried; the first success wins. When every strategy
//! is unavailable or fails the converter yields `None`, so a bad thumbnail
//! never aborts a run.

use super::{ConversionError, ConversionResult};
use crate::core::process::{run_captured, summarize_stderr};
use crate::download::cleanup::{sibling, stem_path};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Bounding box of a converted thumbnail, in pixels
pub const THUMBNAIL_MAX_SIDE: u32 = 320;

/// Rounds a dimension down to an even number (never below 1)
pub fn even_floor(value: u32) -> u32 {
    if value <= 1 {
        value
    } else {
        value & !1
    }
}

/// ffmpeg filter: fit into the bounding box, then force even dimensions
fn ffmpeg_scale_filter() -> String {
    format!(
        "scale=w={side}:h={side}:force_original_aspect_ratio=decrease,scale=trunc(iw/2)*2:trunc(ih/2)*2",
        side = THUMBNAIL_MAX_SIDE
    )
}

/// One way of turning an arbitrary image into a JPEG thumbnail
#[async_trait]
pub trait ThumbnailStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this strategy can run on this machine at all
    fn is_available(&self) -> bool;

    async fn convert(&self, input: &Path, output: &Path) -> ConversionResult<()>;
}

/// In-process decode and re-encode through the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateStrategy;

#[async_trait]
impl ThumbnailStrategy for ImageCrateStrategy {
    fn name(&self) -> &str {
        "image"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn convert(&self, input: &Path, output: &Path) -> ConversionResult<()> {
        let img = image::ImageReader::open(input)?.with_guessed_format()?.decode()?;
        let img = img.thumbnail(THUMBNAIL_MAX_SIDE, THUMBNAIL_MAX_SIDE);

        let (width, height) = (even_floor(img.width()), even_floor(img.height()));
        let img = img.crop_imm(0, 0, width, height);

        img.to_rgb8().save_with_format(output, image::ImageFormat::Jpeg)?;
        Ok(())
    }
}

/// External ffmpeg invocation
#[derive(Debug, Clone)]
pub struct FfmpegStrategy {
    bin: String,
}

impl FfmpegStrategy {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-vf".to_string(),
            ffmpeg_scale_filter(),
            "-frames:v".to_string(),
            "1".to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }
}

#[async_trait]
impl ThumbnailStrategy for FfmpegStrategy {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn is_available(&self) -> bool {
        which::which(&self.bin).is_ok()
    }

    async fn convert(&self, input: &Path, output: &Path) -> ConversionResult<()> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(self.args(input, output))
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let result = run_captured(&mut cmd, &self.bin).await?;
        if !result.status.success() {
            return Err(ConversionError::Ffmpeg(summarize_stderr(&result.stderr)));
        }
        if !output.is_file() {
            return Err(ConversionError::Ffmpeg("no output written".to_string()));
        }
        Ok(())
    }
}

/// Ordered set of thumbnail strategies
pub struct ThumbnailConverter {
    strategies: Vec<Box<dyn ThumbnailStrategy>>,
}

impl ThumbnailConverter {
    /// The image crate first, ffmpeg as fallback
    pub fn new(ffmpeg_bin: impl Into<String>) -> Self {
        Self::with_strategies(vec![
            Box::new(ImageCrateStrategy),
            Box::new(FfmpegStrategy::new(ffmpeg_bin)),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ThumbnailStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Where the JPEG for `input` is written: `<stem>.jpg`, or
    /// `<stem>_thumb.jpg` when the input already has that name.
    pub fn output_path_for(input: &Path) -> PathBuf {
        let stem = stem_path(input);
        let candidate = sibling(&stem, "jpg");
        if candidate == input {
            let mut name = stem.into_os_string();
            name.push("_thumb");
            sibling(Path::new(&name), "jpg")
        } else {
            candidate
        }
    }

    /// Converts `input` into a JPEG thumbnail, or `None` when it is missing
    /// or no strategy succeeded.
    pub async fn convert(&self, input: &Path) -> Option<PathBuf> {
        if !input.is_file() {
            log::warn!("{}", ConversionError::InputNotFound(input.display().to_string()));
            return None;
        }

        let output = Self::output_path_for(input);
        for strategy in &self.strategies {
            if !strategy.is_available() {
                log::debug!("{}", ConversionError::Unavailable(strategy.name().to_string()));
                continue;
            }
            match strategy.convert(input, &output).await {
                Ok(()) => {
                    log::info!(
                        "Converted thumbnail {} -> {} via {}",
                        input.display(),
                        output.display(),
                        strategy.name()
                    );
                    return Some(output);
                }
                Err(e) => {
                    log::warn!("Thumbnail conversion via {} failed: {}", strategy.name(), e);
                    let _ = fs_err::remove_file(&output);
                }
            }
        }

        log::warn!("Could not convert thumbnail {}", input.display());
        None
    }
}
