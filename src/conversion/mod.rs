//! Media conversion helpers.
//!
//! Only thumbnails are converted: the relay backend accepts JPEG previews,
//! while yt-dlp usually writes WebP.

pub mod thumbnail;

use thiserror::Error;

pub use thumbnail::{FfmpegStrategy, ImageCrateStrategy, ThumbnailConverter, ThumbnailStrategy};

/// Errors that can occur during conversion
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Converter unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for ConversionError {
    fn from(err: image::ImageError) -> Self {
        ConversionError::Image(err.to_string())
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;
