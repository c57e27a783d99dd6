//! Dependency wiring and the application boot sequence.

use std::net::SocketAddr;
use std::sync::Arc;

use ripwire_api::ApiServer;
use ripwire_config::{HttpSettings, Settings, load_from_env};
use ripwire_fetch::{FetchOptions, SharedFetcher, YtDlpFetcher};
use ripwire_telemetry::{LoggingConfig, Metrics};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Entry point for the Ripwire application boot sequence.
///
/// # Errors
///
/// Returns an error if settings, telemetry, or application startup fails.
pub async fn run_app() -> AppResult<()> {
    let settings = load_from_env().map_err(|err| AppError::config("settings.load", err))?;
    run_app_with(settings).await
}

/// Boot sequence that relies entirely on injected settings to simplify testing.
async fn run_app_with(settings: Settings) -> AppResult<()> {
    let logging = LoggingConfig::default();
    ripwire_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    info!("Ripwire application bootstrap starting");

    settings
        .ensure_scratch_root()
        .map_err(|err| AppError::config("settings.ensure_scratch_root", err))?;

    let telemetry = Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
    let fetcher = build_fetcher(&settings);
    let api = ApiServer::new(fetcher, settings.fetch.scratch_root.clone(), telemetry);

    let addr = listen_addr(&settings.http);
    info!(addr = %addr, "Launching API listener");

    api.serve(addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn build_fetcher(settings: &Settings) -> SharedFetcher {
    Arc::new(YtDlpFetcher::new(
        settings.fetch.ytdlp_bin.clone(),
        FetchOptions::from_settings(&settings.fetch),
    ))
}

const fn listen_addr(http: &HttpSettings) -> SocketAddr {
    SocketAddr::new(http.bind_addr, http.http_port)
}
