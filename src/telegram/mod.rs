//! Telegram delivery over MTProto (grammers)

pub mod channel;
pub mod client;
pub mod error;
pub mod relay;

pub use channel::ChannelTarget;
pub use client::RelayClient;
pub use error::RelayError;
pub use relay::{Relay, TelegramRelay};
