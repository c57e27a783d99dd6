//! # Design
//!
//! - Centralize application-level errors for the bootstrap sequence.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration operations failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: ripwire_config::ConfigError,
    },
    /// API server operations failed.
    #[error("api server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source API server error.
        source: ripwire_api::ApiServerError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: anyhow::Error,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: ripwire_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: ripwire_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }

    pub(crate) const fn telemetry(operation: &'static str, source: anyhow::Error) -> Self {
        Self::Telemetry { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "settings.load",
            ripwire_config::ConfigError::InvalidField {
                field: "http_port",
                value: Some("0".to_string()),
                reason: "zero",
            },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert_eq!(config.to_string(), "configuration operation failed");

        let api = AppError::api_server(
            "api_server.serve",
            ripwire_api::ApiServerError::Serve {
                source: io::Error::other("io"),
            },
        );
        assert!(matches!(api, AppError::ApiServer { .. }));

        let telemetry = AppError::telemetry("telemetry.init", anyhow::anyhow!("subscriber set"));
        assert!(matches!(telemetry, AppError::Telemetry { .. }));
    }
}
