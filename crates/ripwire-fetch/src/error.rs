//! Error types for fetch operations.

use std::io;

use thiserror::Error;

/// Result alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors raised by fetch backends.
///
/// The `Display` output of these variants is surfaced verbatim in the HTTP
/// failure detail, so each carries the underlying collaborator text rather
/// than a constant message.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Launching the collaborator process failed.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that could not be started.
        program: String,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The collaborator ran but reported a failure.
    #[error("{message}")]
    Collaborator {
        /// Error text reported by the collaborator.
        message: String,
    },
}

impl FetchError {
    /// Build a collaborator failure from reported error text.
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn collaborator_display_carries_the_reported_text() {
        let err = FetchError::collaborator("network unreachable");
        assert_eq!(err.to_string(), "network unreachable");
        assert!(err.source().is_none());
    }

    #[test]
    fn spawn_display_names_the_program() {
        let err = FetchError::Spawn {
            program: "yt-dlp".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().starts_with("failed to run yt-dlp"));
        assert!(err.source().is_some());
    }
}
