//! Mock implementations of the extraction backend and the relay
//!
//! Lets the full prompt flow run without yt-dlp or Telegram.

pub mod mock_extractor;
pub mod mock_relay;

#[allow(unused_imports)]
pub use mock_extractor::{MockExtractor, MockFormat, MockResource};
#[allow(unused_imports)]
pub use mock_relay::{MockRelay, SentVideo};
