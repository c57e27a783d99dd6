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

//! Telemetry primitives shared across the Ripwire workspace.
//!
//! Centralises logging, metrics, and request-id helpers so the API surface and
//! the application binary adopt a consistent observability story.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing_subscriber::{EnvFilter, fmt};

/// Default logging target when `RUST_LOG` is not provided.
const DEFAULT_LOG_LEVEL: &str = "info";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed (for example,
/// because another subscriber has already been set globally).
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    BUILD_SHA
        .set(config.build_sha.to_string())
        .ok()
        .or(Some(()));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level));

    let install = |format: LogFormat| {
        let builder = fmt::fmt()
            .with_env_filter(env_filter.clone())
            .with_target(false)
            .with_thread_ids(false);

        match format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
        }
    };

    install(config.format).map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    Ok(())
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Default filter directive when `RUST_LOG` is absent.
    pub level: &'a str,
    /// Output format for the installed subscriber.
    pub format: LogFormat,
    /// Build identifier stamped onto log context.
    pub build_sha: &'a str,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            build_sha: build_sha(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    /// Structured JSON lines.
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Access the build SHA recorded during logging initialisation.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}

/// Factory for the `x-request-id` generator layer.
#[must_use]
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that propagates an incoming `x-request-id` header.
#[must_use]
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Outcome label recorded against the download counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The MP3 was produced and returned.
    Ok,
    /// The collaborator raised during fetch or transcode.
    FetchFailed,
    /// The collaborator returned success but left no artifact.
    MissingArtifact,
}

impl DownloadOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::FetchFailed => "fetch_failed",
            Self::MissingArtifact => "missing_artifact",
        }
    }
}

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    downloads_total: IntCounterVec,
    downloads_in_flight: IntGauge,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )?;
        let downloads_total = IntCounterVec::new(
            Opts::new("downloads_total", "Completed download requests by outcome"),
            &["outcome"],
        )?;
        let downloads_in_flight = IntGauge::with_opts(Opts::new(
            "downloads_in_flight",
            "Download requests currently occupying a worker",
        ))?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(downloads_total.clone()))?;
        registry.register(Box::new(downloads_in_flight.clone()))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                downloads_total,
                downloads_in_flight,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Increment the download counter for the given outcome.
    pub fn inc_download(&self, outcome: DownloadOutcome) {
        self.inner
            .downloads_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Track a download entering the fetch phase; the guard decrements on drop.
    #[must_use]
    pub fn download_started(&self) -> InFlightGuard {
        self.inner.downloads_in_flight.inc();
        InFlightGuard {
            gauge: Arc::clone(&self.inner),
        }
    }

    /// Current number of in-flight downloads.
    #[must_use]
    pub fn downloads_in_flight(&self) -> i64 {
        self.inner.downloads_in_flight.get()
    }

    /// Render the registry in Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding the metric families fails.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.inner.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Guard that keeps the in-flight gauge accurate across every handler exit path.
pub struct InFlightGuard {
    gauge: Arc<MetricsInner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.downloads_in_flight.dec();
    }
}
