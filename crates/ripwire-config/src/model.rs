//! Typed settings models shared across the workspace.

use std::net::IpAddr;
use std::path::PathBuf;

/// Listener settings for the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Interface the API listener binds to.
    pub bind_addr: IpAddr,
    /// TCP port the API listener binds to.
    pub http_port: u16,
}

/// Settings handed to the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Program name or path of the yt-dlp binary.
    pub ytdlp_bin: String,
    /// Root directory for request-scoped scratch files.
    pub scratch_root: PathBuf,
    /// Audio quality passed to the transcoder (e.g. `192K`).
    pub audio_quality: String,
}
