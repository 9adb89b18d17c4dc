//! MTProto client wrapper around grammers

use super::channel::ChannelTarget;
use super::error::RelayError;
use grammers_client::{Client, Config, InitParams};
use grammers_session::{PackedChat, PackedType, Session};
use std::path::Path;

/// Authenticated bot session
pub struct RelayClient {
    client: Client,
}

impl RelayClient {
    /// Connects and signs in as a bot, reusing `session_path` when it exists
    ///
    /// # Arguments
    /// * `api_id` - Telegram API ID from my.telegram.org
    /// * `api_hash` - Telegram API hash from my.telegram.org
    /// * `bot_token` - Bot token from @BotFather
    /// * `session_path` - Path to save/load session file
    pub async fn connect_bot(
        api_id: i32,
        api_hash: &str,
        bot_token: &str,
        session_path: &Path,
    ) -> Result<Self, RelayError> {
        let session = if session_path.exists() {
            log::info!("Loading existing session from {:?}", session_path);
            Session::load_file(session_path)
                .map_err(|e| RelayError::Session(format!("Failed to load session: {}", e)))?
        } else {
            log::info!("Creating new session");
            Session::new()
        };

        let config = Config {
            session,
            api_id,
            api_hash: api_hash.to_string(),
            params: InitParams {
                device_model: "ytrelay".to_string(),
                system_version: "1.0".to_string(),
                app_version: env!("CARGO_PKG_VERSION").to_string(),
                system_lang_code: "en".to_string(),
                lang_code: "en".to_string(),
                ..Default::default()
            },
        };

        log::info!("Connecting to Telegram...");
        let client = Client::connect(config)
            .await
            .map_err(|e| RelayError::Session(format!("Failed to connect: {}", e)))?;

        if !client.is_authorized().await? {
            log::info!("Not authorized, signing in as bot...");
            client
                .bot_sign_in(bot_token)
                .await
                .map_err(|e| RelayError::SignIn(e.to_string()))?;
            save_session(&client, session_path)?;
        } else {
            log::info!("Already authorized");
        }

        Ok(Self { client })
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Turns a destination into a chat reference the client can send to
    pub async fn resolve(&self, target: &ChannelTarget) -> Result<PackedChat, RelayError> {
        match target {
            ChannelTarget::Channel(id) => Ok(PackedChat {
                ty: PackedType::Broadcast,
                id: *id,
                access_hash: None,
            }),
            ChannelTarget::Group(id) => Ok(PackedChat {
                ty: PackedType::Chat,
                id: *id,
                access_hash: None,
            }),
            ChannelTarget::Username(name) => self
                .client
                .resolve_username(name)
                .await?
                .map(|chat| chat.pack())
                .ok_or_else(|| RelayError::Channel(format!("Channel @{} not found", name))),
        }
    }
}

fn save_session(client: &Client, session_path: &Path) -> Result<(), RelayError> {
    if let Some(parent) = session_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs_err::create_dir_all(parent)
                .map_err(|e| RelayError::Session(format!("Failed to create session directory: {}", e)))?;
        }
    }
    // grammers-session 0.5 writes into an existing file
    if !session_path.exists() {
        fs_err::File::create(session_path)
            .map_err(|e| RelayError::Session(format!("Failed to create session file: {}", e)))?;
    }
    client
        .session()
        .save_to_file(session_path)
        .map_err(|e| RelayError::Session(format!("Failed to save session: {}", e)))?;
    log::info!("Session saved to {:?}", session_path);
    Ok(())
}
