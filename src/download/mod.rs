//! Download management: listing, estimation, playlist expansion, fetch and cleanup

pub mod backend;
pub mod cleanup;
pub mod cookies;
pub mod fetch;
pub mod formats;
pub mod playlist;
pub mod size;
pub mod types;

// Re-exports for convenience
pub use backend::{ExtractionBackend, YtDlpBackend};
pub use cleanup::{cleanup, ArtifactGuard, CleanupReport};
pub use fetch::fetch;
pub use formats::list_formats;
pub use playlist::{is_collection, list_entries};
pub use size::estimate_size_mb;
pub use types::{ContainerKind, DownloadResult, FormatDescriptor, FormatSelection, FormatTable, PlaylistEntry, ResourceInfo};
