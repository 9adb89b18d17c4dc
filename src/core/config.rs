//! Run configuration, read once from the environment
//!
//! Nothing here is global: `Settings` and `Credentials` are built in `main`
//! and handed to the [`RunContext`](crate::core::context::RunContext).

use crate::telegram::channel::ChannelTarget;
use indoc::indoc;
use secrecy::SecretString;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable names
pub mod vars {
    pub const API_ID: &str = "TELEGRAM_API_ID";
    pub const API_HASH: &str = "TELEGRAM_API_HASH";
    pub const BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
    pub const CHANNEL_ID: &str = "TELEGRAM_CHANNEL_ID";

    pub const YTDL_BIN: &str = "YTDL_BIN";
    pub const FFMPEG_BIN: &str = "FFMPEG_BIN";
    pub const YTDL_COOKIES_FILE: &str = "YTDL_COOKIES_FILE";
    pub const DOWNLOAD_FOLDER: &str = "DOWNLOAD_FOLDER";
    pub const SESSION_FILE: &str = "SESSION_FILE";
    pub const LOG_FILE_PATH: &str = "LOG_FILE_PATH";
    pub const MAX_SIZE_MB: &str = "MAX_SIZE_MB";
    pub const PLAYLIST_MAX_SIZE_MB: &str = "PLAYLIST_MAX_SIZE_MB";

    /// Credentials that must be present before any network activity
    pub const REQUIRED: [&str; 4] = [API_ID, API_HASH, BOT_TOKEN, CHANNEL_ID];
}

/// Size ceilings
pub mod limits {
    /// Single-resource runs above this estimate ask for confirmation
    pub const DEFAULT_MAX_SIZE_MB: f64 = 1500.0;

    /// Collection members above this estimate are skipped
    /// Kept at the MTProto upload limit for bots
    pub const DEFAULT_PLAYLIST_MAX_SIZE_MB: f64 = 2000.0;
}

/// Credential loading errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("TELEGRAM_API_ID must be numeric, got '{0}'")]
    InvalidApiId(String),

    #[error("TELEGRAM_CHANNEL_ID must be -100<id>, a numeric id or @username, got '{0}'")]
    InvalidChannel(String),
}

/// Telegram credentials and destination
#[derive(Debug)]
pub struct Credentials {
    pub api_id: i32,
    pub api_hash: SecretString,
    pub bot_token: SecretString,
    pub channel: ChannelTarget,
}

impl Credentials {
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds credentials from an arbitrary lookup; every missing name is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing: Vec<&'static str> = vars::REQUIRED.into_iter().filter(|&name| get(name).is_none()).collect();
        if !missing.is_empty() {
            return Err(CredentialsError::Missing(missing));
        }

        let raw_id = get(vars::API_ID).unwrap_or_default();
        let api_id = raw_id
            .parse::<i32>()
            .map_err(|_| CredentialsError::InvalidApiId(raw_id.clone()))?;

        let raw_channel = get(vars::CHANNEL_ID).unwrap_or_default();
        let channel = raw_channel
            .parse::<ChannelTarget>()
            .map_err(|_| CredentialsError::InvalidChannel(raw_channel.clone()))?;

        Ok(Self {
            api_id,
            api_hash: SecretString::from(get(vars::API_HASH).unwrap_or_default()),
            bot_token: SecretString::from(get(vars::BOT_TOKEN).unwrap_or_default()),
            channel,
        })
    }
}

/// Setup guidance printed after the list of missing variables
pub fn setup_instructions() -> &'static str {
    indoc! {"
        Create a .env file in the working directory with the following content:

        TELEGRAM_API_ID=your_api_id
        TELEGRAM_API_HASH=your_api_hash
        TELEGRAM_BOT_TOKEN=your_bot_token
        TELEGRAM_CHANNEL_ID=-100XXXXXXXXXX # numeric channel id or @username

        Replace the values with your actual Telegram API credentials.
        You can obtain them from https://my.telegram.org/apps
        The bot must be an administrator of the destination channel.
    "}
}

/// Non-secret settings with defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// yt-dlp executable (YTDL_BIN, default `yt-dlp`)
    pub ytdl_bin: String,
    /// ffmpeg executable (FFMPEG_BIN, default `ffmpeg`)
    pub ffmpeg_bin: String,
    /// Cookie file offered as the default answer at the cookie prompt
    pub default_cookies: Option<String>,
    /// Where artifacts are written (DOWNLOAD_FOLDER, tilde expanded, default `.`)
    pub download_dir: PathBuf,
    /// MTProto session file (SESSION_FILE, default `ytrelay.session`)
    pub session_file: PathBuf,
    /// Log file (LOG_FILE_PATH, default `ytrelay.log`)
    pub log_file: String,
    pub max_size_mb: f64,
    /// Never below `max_size_mb`
    pub playlist_max_size_mb: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ytdl_bin: "yt-dlp".to_string(),
            ffmpeg_bin: "ffmpeg".to_string(),
            default_cookies: None,
            download_dir: PathBuf::from("."),
            session_file: PathBuf::from("ytrelay.session"),
            log_file: "ytrelay.log".to_string(),
            max_size_mb: limits::DEFAULT_MAX_SIZE_MB,
            playlist_max_size_mb: limits::DEFAULT_PLAYLIST_MAX_SIZE_MB,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let megabytes = |name: &str, default: f64| match get(name) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v > 0.0 => v,
                _ => {
                    log::warn!("{}={} is not a positive number, using {}", name, raw, default);
                    default
                }
            },
            None => default,
        };

        let max_size_mb = megabytes(vars::MAX_SIZE_MB, defaults.max_size_mb);
        let mut playlist_max_size_mb = megabytes(vars::PLAYLIST_MAX_SIZE_MB, defaults.playlist_max_size_mb);
        if playlist_max_size_mb < max_size_mb {
            log::warn!(
                "{} ({}) is below {} ({}), raising it",
                vars::PLAYLIST_MAX_SIZE_MB,
                playlist_max_size_mb,
                vars::MAX_SIZE_MB,
                max_size_mb
            );
            playlist_max_size_mb = max_size_mb;
        }

        Self {
            ytdl_bin: get(vars::YTDL_BIN).unwrap_or(defaults.ytdl_bin),
            ffmpeg_bin: get(vars::FFMPEG_BIN).unwrap_or(defaults.ffmpeg_bin),
            default_cookies: get(vars::YTDL_COOKIES_FILE),
            download_dir: get(vars::DOWNLOAD_FOLDER)
                .map(|d| PathBuf::from(shellexpand::tilde(&d).into_owned()))
                .unwrap_or(defaults.download_dir),
            session_file: get(vars::SESSION_FILE).map(PathBuf::from).unwrap_or(defaults.session_file),
            log_file: get(vars::LOG_FILE_PATH).unwrap_or(defaults.log_file),
            max_size_mb,
            playlist_max_size_mb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_credentials_all_missing() {
        let err = Credentials::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, CredentialsError::Missing(vars::REQUIRED.to_vec()));
    }

    #[test]
    fn test_credentials_reports_every_missing_name() {
        let err = Credentials::from_lookup(lookup(&[(vars::API_ID, "123"), (vars::BOT_TOKEN, "  ")])).unwrap_err();
        assert_eq!(
            err,
            CredentialsError::Missing(vec![vars::API_HASH, vars::BOT_TOKEN, vars::CHANNEL_ID])
        );
        assert!(err.to_string().contains("TELEGRAM_API_HASH"));
    }

    #[test]
    fn test_credentials_invalid_api_id() {
        let err = Credentials::from_lookup(lookup(&[
            (vars::API_ID, "abc"),
            (vars::API_HASH, "hash"),
            (vars::BOT_TOKEN, "1:token"),
            (vars::CHANNEL_ID, "-1001"),
        ]))
        .unwrap_err();
        assert_eq!(err, CredentialsError::InvalidApiId("abc".into()));
    }

    #[test]
    fn test_credentials_ok() {
        let creds = Credentials::from_lookup(lookup(&[
            (vars::API_ID, "12345"),
            (vars::API_HASH, "hash"),
            (vars::BOT_TOKEN, "1:token"),
            (vars::CHANNEL_ID, "-1001234567890"),
        ]))
        .unwrap();
        assert_eq!(creds.api_id, 12345);
        assert_eq!(creds.api_hash.expose_secret(), "hash");
        assert_eq!(creds.bot_token.expose_secret(), "1:token");
        assert_eq!(creds.channel, ChannelTarget::Channel(1234567890));
    }

    #[test]
    fn test_credentials_invalid_channel() {
        let err = Credentials::from_lookup(lookup(&[
            (vars::API_ID, "12345"),
            (vars::API_HASH, "hash"),
            (vars::BOT_TOKEN, "1:token"),
            (vars::CHANNEL_ID, " my channel "),
        ]))
        .unwrap_err();
        assert_eq!(err, CredentialsError::InvalidChannel("my channel".into()));
        assert!(err.to_string().starts_with("TELEGRAM_CHANNEL_ID must be"));
    }

    #[test]
    fn test_settings_defaults() {
        assert_eq!(Settings::from_lookup(lookup(&[])), Settings::default());
    }

    #[test]
    fn test_settings_overrides_and_clamping() {
        let settings = Settings::from_lookup(lookup(&[
            (vars::YTDL_BIN, "/opt/yt-dlp"),
            (vars::MAX_SIZE_MB, "500"),
            (vars::PLAYLIST_MAX_SIZE_MB, "100"),
            (vars::YTDL_COOKIES_FILE, "cookies.txt"),
        ]));
        assert_eq!(settings.ytdl_bin, "/opt/yt-dlp");
        assert_eq!(settings.max_size_mb, 500.0);
        assert_eq!(settings.playlist_max_size_mb, 500.0);
        assert_eq!(settings.default_cookies.as_deref(), Some("cookies.txt"));
    }

    #[test]
    fn test_settings_bad_number_uses_default() {
        let settings = Settings::from_lookup(lookup(&[(vars::MAX_SIZE_MB, "lots")]));
        assert_eq!(settings.max_size_mb, limits::DEFAULT_MAX_SIZE_MB);
    }

    #[test]
    #[serial]
    fn test_settings_from_process_env() {
        env::set_var(vars::FFMPEG_BIN, "/usr/local/bin/ffmpeg");
        let settings = Settings::from_env();
        env::remove_var(vars::FFMPEG_BIN);
        assert_eq!(settings.ffmpeg_bin, "/usr/local/bin/ffmpeg");
    }

    #[test]
    fn test_setup_instructions_mention_every_variable() {
        let text = setup_instructions();
        for name in vars::REQUIRED {
            assert!(text.contains(name), "missing {}", name);
        }
    }
}
