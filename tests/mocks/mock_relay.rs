//! Recording relay
//!
//! Captures what would have been sent, checking file existence at call time.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use ytrelay::download::DownloadResult;
use ytrelay::telegram::Relay;
use ytrelay::AppError;

/// One recorded send
#[derive(Debug, Clone)]
pub struct SentVideo {
    pub title: String,
    pub video_path: PathBuf,
    pub duration: u64,
    /// Thumbnail that existed on disk when the send happened
    pub thumbnail: Option<PathBuf>,
}

#[derive(Default)]
pub struct MockRelay {
    fail_titles: HashSet<String>,
    pub sent: Mutex<Vec<SentVideo>>,
}

impl MockRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, title: &str) -> Self {
        self.fail_titles.insert(title.to_string());
        self
    }

    pub fn sent(&self) -> Vec<SentVideo> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_titles(&self) -> Vec<String> {
        self.sent().into_iter().map(|s| s.title).collect()
    }
}

#[async_trait]
impl Relay for MockRelay {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_video(&self, result: &DownloadResult) -> Result<(), AppError> {
        if !result.video_path.is_file() {
            return Err(AppError::Upload(format!(
                "Video file not found: {}",
                result.video_path.display()
            )));
        }
        if self.fail_titles.contains(&result.title) {
            return Err(AppError::Upload("FLOOD_WAIT (30)".into()));
        }

        self.sent.lock().unwrap().push(SentVideo {
            title: result.title.clone(),
            video_path: result.video_path.clone(),
            duration: result.duration,
            thumbnail: result.thumbnail_path.clone().filter(|p| p.is_file()),
        });
        Ok(())
    }
}
