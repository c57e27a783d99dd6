//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Scratch root could not be prepared.
    #[error("scratch root unavailable")]
    ScratchRoot {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl ConfigError {
    pub(crate) const fn invalid(
        field: &'static str,
        value: Option<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidField {
            field,
            value,
            reason,
        }
    }
}
