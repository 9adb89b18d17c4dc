//! Relay of finished downloads to the destination channel

use super::channel::ChannelTarget;
use super::client::RelayClient;
use super::error::RelayError;
use crate::core::config::Credentials;
use crate::core::error::AppError;
use crate::download::types::DownloadResult;
use async_trait::async_trait;
use grammers_client::types::Attribute;
use grammers_client::InputMessage;
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Trait for relay implementations.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Human-readable name of this relay (e.g. "telegram")
    fn name(&self) -> &str;

    /// Sends the container file of `result` with its title as caption.
    ///
    /// Fails with `AppError::Upload` when the file is missing or the backend
    /// rejects the transfer.
    async fn send_video(&self, result: &DownloadResult) -> Result<(), AppError>;
}

/// Thumbnail to attach, when the referenced file still exists
pub fn existing_thumbnail(result: &DownloadResult) -> Option<&Path> {
    result.thumbnail_path.as_deref().filter(|p| p.is_file())
}

/// Relay over a Telegram bot account (MTProto)
///
/// The session is opened on the first send and reused for the rest of the run.
pub struct TelegramRelay {
    credentials: Credentials,
    session_file: PathBuf,
    client: OnceCell<RelayClient>,
}

impl TelegramRelay {
    pub fn new(credentials: Credentials, session_file: impl Into<PathBuf>) -> Self {
        Self {
            credentials,
            session_file: session_file.into(),
            client: OnceCell::new(),
        }
    }

    pub fn target(&self) -> &ChannelTarget {
        &self.credentials.channel
    }

    async fn client(&self) -> Result<&RelayClient, RelayError> {
        self.client
            .get_or_try_init(|| {
                RelayClient::connect_bot(
                    self.credentials.api_id,
                    self.credentials.api_hash.expose_secret(),
                    self.credentials.bot_token.expose_secret(),
                    &self.session_file,
                )
            })
            .await
    }

    async fn upload(&self, result: &DownloadResult) -> Result<(), RelayError> {
        if !result.video_path.is_file() {
            return Err(RelayError::MissingFile(result.video_path.clone()));
        }

        let client = self.client().await?;
        let chat = client.resolve(self.target()).await?;

        log::info!("Uploading {} to {}", result.video_path.display(), self.target());
        let video = client.inner().upload_file(&result.video_path).await?;

        let mut message = InputMessage::text(result.title.as_str())
            .document(video)
            .mime_type(result.container.mime_type())
            .attribute(Attribute::Video {
                round_message: false,
                supports_streaming: true,
                duration: Duration::from_secs(result.duration),
                w: result.width.unwrap_or(0) as i32,
                h: result.height.unwrap_or(0) as i32,
            });

        match existing_thumbnail(result) {
            Some(thumb) => {
                let uploaded = client.inner().upload_file(thumb).await?;
                message = message.thumbnail(uploaded);
            }
            None => log::debug!("Sending '{}' without thumbnail", result.title),
        }

        client.inner().send_message(chat, message).await?;
        log::info!("Uploaded '{}' to {}", result.title, self.target());
        Ok(())
    }
}

#[async_trait]
impl Relay for TelegramRelay {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_video(&self, result: &DownloadResult) -> Result<(), AppError> {
        self.upload(result).await.map_err(|e| {
            log::error!("Upload of '{}' failed: {}", result.title, e);
            AppError::from(e)
        })
    }
}
