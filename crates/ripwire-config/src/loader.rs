//! Environment parsing and validation for service settings.

use std::env;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{FetchSettings, HttpSettings};

const ENV_BIND_ADDR: &str = "RIPWIRE_BIND_ADDR";
const ENV_HTTP_PORT: &str = "RIPWIRE_HTTP_PORT";
const ENV_SCRATCH_ROOT: &str = "RIPWIRE_SCRATCH_ROOT";
const ENV_YTDLP_BIN: &str = "RIPWIRE_YTDLP_BIN";
const ENV_AUDIO_QUALITY: &str = "RIPWIRE_AUDIO_QUALITY";

const DEFAULT_HTTP_PORT: u16 = 8000;
const DEFAULT_YTDLP_BIN: &str = "yt-dlp";
const DEFAULT_AUDIO_QUALITY: &str = "192K";

/// Fully validated runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// HTTP listener settings.
    pub http: HttpSettings,
    /// Fetch collaborator settings.
    pub fetch: FetchSettings,
}

impl Settings {
    /// Build settings from a key lookup function.
    ///
    /// Split out from [`load_from_env`] so tests can supply values without
    /// touching process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if any supplied value fails to parse or validate.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let bind_addr = match lookup(ENV_BIND_ADDR) {
            Some(raw) => raw.parse::<IpAddr>().map_err(|_| {
                ConfigError::invalid("bind_addr", Some(raw), "unparseable_ip_addr")
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let http_port = match lookup(ENV_HTTP_PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::invalid("http_port", Some(raw), "unparseable_port"))?,
            None => DEFAULT_HTTP_PORT,
        };
        if http_port == 0 {
            return Err(ConfigError::invalid(
                "http_port",
                Some(http_port.to_string()),
                "zero",
            ));
        }

        let scratch_root = lookup(ENV_SCRATCH_ROOT).map_or_else(env::temp_dir, PathBuf::from);

        let ytdlp_bin = lookup(ENV_YTDLP_BIN).unwrap_or_else(|| DEFAULT_YTDLP_BIN.to_string());
        if ytdlp_bin.trim().is_empty() {
            return Err(ConfigError::invalid("ytdlp_bin", Some(ytdlp_bin), "empty"));
        }

        let audio_quality =
            lookup(ENV_AUDIO_QUALITY).unwrap_or_else(|| DEFAULT_AUDIO_QUALITY.to_string());
        if audio_quality.trim().is_empty() {
            return Err(ConfigError::invalid(
                "audio_quality",
                Some(audio_quality),
                "empty",
            ));
        }

        Ok(Self {
            http: HttpSettings {
                bind_addr,
                http_port,
            },
            fetch: FetchSettings {
                ytdlp_bin,
                scratch_root,
                audio_quality,
            },
        })
    }

    /// Create the scratch root directory if it does not already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_scratch_root(&self) -> ConfigResult<()> {
        fs::create_dir_all(&self.fetch.scratch_root).map_err(|source| {
            ConfigError::ScratchRoot {
                path: self.fetch.scratch_root.clone(),
                source,
            }
        })
    }
}

/// Load settings from process environment variables.
///
/// # Errors
///
/// Returns an error if any environment value fails to parse or validate.
pub fn load_from_env() -> ConfigResult<Settings> {
    Settings::from_lookup(|key| env::var(key).ok())
}
