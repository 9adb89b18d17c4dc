//! Per-run context handed to every stage

use crate::conversion::ThumbnailConverter;
use crate::core::config::Settings;
use crate::download::backend::ExtractionBackend;
use crate::telegram::relay::Relay;
use std::sync::Arc;

/// Everything one run needs, built once in `main` and threaded through the
/// orchestrator. Tests swap the backend and relay for scripted ones.
pub struct RunContext {
    pub settings: Settings,
    pub extractor: Arc<dyn ExtractionBackend>,
    pub relay: Arc<dyn Relay>,
    pub thumbnails: ThumbnailConverter,
}

impl RunContext {
    pub fn new(
        settings: Settings,
        extractor: Arc<dyn ExtractionBackend>,
        relay: Arc<dyn Relay>,
        thumbnails: ThumbnailConverter,
    ) -> Self {
        log::debug!(
            "Run context: extractor={}, relay={}, thumbnails={:?}, download_dir={}",
            extractor.name(),
            relay.name(),
            thumbnails.strategy_names(),
            settings.download_dir.display()
        );
        Self {
            settings,
            extractor,
            relay,
            thumbnails,
        }
    }
}
