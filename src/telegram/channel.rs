//! Destination channel addressing

use super::error::RelayError;
use std::fmt;
use std::str::FromStr;

/// Prefix Bot API style ids carry for channels and supergroups
const CHANNEL_ID_PREFIX: &str = "-100";

/// Where relayed files go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelTarget {
    /// Channel or supergroup by bare MTProto id
    Channel(i64),
    /// Legacy basic group by bare id
    Group(i64),
    /// Public `@username`, resolved at send time
    Username(String),
}

impl FromStr for ChannelTarget {
    type Err = RelayError;

    /// Accepts `-100…` channel ids, `-…` group ids, plain numeric ids and `@username`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || RelayError::Channel(format!("Invalid channel id: '{}'", s));

        if let Some(name) = s.strip_prefix('@') {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid());
            }
            return Ok(ChannelTarget::Username(name.to_string()));
        }

        if let Some(id) = s.strip_prefix(CHANNEL_ID_PREFIX) {
            return id.parse::<i64>().ok().filter(|id| *id > 0).map(ChannelTarget::Channel).ok_or_else(invalid);
        }

        if let Some(id) = s.strip_prefix('-') {
            return id.parse::<i64>().ok().filter(|id| *id > 0).map(ChannelTarget::Group).ok_or_else(invalid);
        }

        s.parse::<i64>().ok().filter(|id| *id > 0).map(ChannelTarget::Channel).ok_or_else(invalid)
    }
}

impl fmt::Display for ChannelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelTarget::Channel(id) => write!(f, "{}{}", CHANNEL_ID_PREFIX, id),
            ChannelTarget::Group(id) => write!(f, "-{}", id),
            ChannelTarget::Username(name) => write!(f, "@{}", name),
        }
    }
}
