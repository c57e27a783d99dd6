#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Backend-agnostic audio fetch interfaces and the yt-dlp implementation.
//!
//! Layout: `scratch.rs` (request-scoped output path guard), `ytdlp.rs`
//! (subprocess backend), `error.rs` (fetch errors).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ripwire_config::FetchSettings;

pub mod error;
pub mod scratch;
pub mod ytdlp;

pub use error::{FetchError, FetchResult};
pub use scratch::ScratchFile;
pub use ytdlp::YtDlpFetcher;

/// Fixed format selector handed to the collaborator: best audio-only stream,
/// falling back to the best combined stream.
pub const FORMAT_SELECTOR: &str = "bestaudio/best";

/// Audio container the collaborator transcodes into.
pub const AUDIO_CODEC: &str = "mp3";

/// Options applied to every fetch performed by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Stream selection expression (see [`FORMAT_SELECTOR`]).
    pub format_selector: String,
    /// Transcode target quality (e.g. `192K`).
    pub audio_quality: String,
    /// Suppress collaborator progress and warning output.
    pub quiet: bool,
}

impl FetchOptions {
    /// Derive fetch options from validated settings.
    #[must_use]
    pub fn from_settings(settings: &FetchSettings) -> Self {
        Self {
            format_selector: FORMAT_SELECTOR.to_string(),
            audio_quality: settings.audio_quality.clone(),
            quiet: true,
        }
    }
}

/// Capability seam over the external fetch-and-transcode collaborator.
///
/// Implementations either complete without error and (normally) leave an MP3
/// at `destination`, or fail with a message describing what went wrong. The
/// caller owns the existence check on the destination; a backend returning
/// `Ok` is not a guarantee that the artifact materialised.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Fetch `url` and transcode its best audio track to `destination`.
    ///
    /// # Errors
    ///
    /// Returns an error when the collaborator cannot be launched or reports a
    /// fetch/transcode failure.
    async fn fetch(&self, url: &str, destination: &Path) -> FetchResult<()>;
}

/// Shared handle to the configured fetch backend.
pub type SharedFetcher = Arc<dyn AudioFetcher>;
