//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, Request, header::CONTENT_TYPE},
    routing::get,
};
use ripwire_fetch::SharedFetcher;
use ripwire_telemetry::Metrics;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::download::download;
use crate::http::health::{health, metrics};
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::ApiState;

/// Axum router wrapper that hosts the Ripwire API services.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct a new API server with shared dependencies wired through application state.
    #[must_use]
    pub fn new(fetcher: SharedFetcher, scratch_root: PathBuf, telemetry: Metrics) -> Self {
        let state = Arc::new(ApiState::new(fetcher, scratch_root, telemetry.clone()));

        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let method = request.method().clone();
                let uri_path = request.uri().path();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %method,
                    route = %uri_path,
                    request_id = %request_id,
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    let status = response.status().as_u16();
                    span.record("status_code", status);
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(ripwire_telemetry::propagate_request_id_layer())
            .layer(ripwire_telemetry::set_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));

        let router = Self::build_router()
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    fn build_router() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/download", get(download))
            .route("/health", get(health))
            .route("/metrics", get(metrics))
    }

    /// Serve the API using the configured router on the supplied address.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> ApiServerResult<()> {
        tracing::info!("Starting API on {}", addr);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Serve { source })?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) const fn router(&self) -> &Router {
        &self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;

    use anyhow::{Context, Result};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request as HttpRequest, StatusCode, header};
    use ripwire_fetch::{AudioFetcher, FetchError, FetchResult};
    use tower::ServiceExt;

    use crate::http::errors::ProblemDetails;

    const BODY_LIMIT: usize = 16 * 1024 * 1024;

    enum StubBehavior {
        /// Write the given bytes to the destination and report success.
        Write(Vec<u8>),
        /// Write per-URL bytes to the destination and report success.
        WritePerUrl(HashMap<String, Vec<u8>>),
        /// Report a collaborator failure with the given message.
        Fail(String),
        /// Report success without writing anything.
        WriteNothing,
    }

    struct StubFetcher {
        behavior: StubBehavior,
        destinations: Mutex<Vec<PathBuf>>,
    }

    impl StubFetcher {
        fn new(behavior: StubBehavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                destinations: Mutex::new(Vec::new()),
            })
        }

        fn seen_destinations(&self) -> Vec<PathBuf> {
            self.destinations.lock().expect("destinations lock").clone()
        }
    }

    #[async_trait]
    impl AudioFetcher for StubFetcher {
        async fn fetch(&self, url: &str, destination: &Path) -> FetchResult<()> {
            self.destinations
                .lock()
                .expect("destinations lock")
                .push(destination.to_path_buf());
            match &self.behavior {
                StubBehavior::Write(bytes) => {
                    tokio::fs::write(destination, bytes).await.expect("write");
                    Ok(())
                }
                StubBehavior::WritePerUrl(map) => {
                    let bytes = map.get(url).expect("bytes for url");
                    tokio::fs::write(destination, bytes).await.expect("write");
                    Ok(())
                }
                StubBehavior::Fail(message) => Err(FetchError::collaborator(message.clone())),
                StubBehavior::WriteNothing => Ok(()),
            }
        }
    }

    fn server_with(fetcher: Arc<StubFetcher>, scratch_root: &Path) -> Result<ApiServer> {
        let telemetry = Metrics::new()?;
        Ok(ApiServer::new(
            fetcher,
            scratch_root.to_path_buf(),
            telemetry,
        ))
    }

    fn download_request(url: &str) -> Result<HttpRequest<Body>> {
        HttpRequest::builder()
            .uri(format!("/download?url={url}"))
            .body(Body::empty())
            .context("build request")
    }

    async fn problem_body(response: axum::response::Response) -> Result<ProblemDetails> {
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await?;
        serde_json::from_slice(&bytes).context("decode problem details")
    }

    fn scratch_entries(root: &Path) -> Result<usize> {
        Ok(std::fs::read_dir(root)?.count())
    }

    #[tokio::test]
    async fn successful_fetch_returns_the_mp3_bytes() -> Result<()> {
        let root = tempfile::tempdir()?;
        let stub = StubFetcher::new(StubBehavior::Write(vec![7_u8; 1000]));
        let server = server_with(Arc::clone(&stub), root.path())?;

        let response = server
            .router()
            .clone()
            .oneshot(download_request("https://example.com/valid-video")?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("audio/mpeg")
        );
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
            Some("attachment; filename=\"music.mp3\"")
        );
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await?;
        assert_eq!(bytes.len(), 1000);

        // Scratch file is removed once the bytes are captured.
        assert_eq!(scratch_entries(root.path())?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn collaborator_failure_maps_to_bad_request() -> Result<()> {
        let root = tempfile::tempdir()?;
        let stub = StubFetcher::new(StubBehavior::Fail("network unreachable".to_string()));
        let server = server_with(stub, root.path())?;

        let response = server
            .router()
            .clone()
            .oneshot(download_request("https://example.com/unreachable")?)
            .await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let problem = problem_body(response).await?;
        assert_eq!(
            problem.detail.as_deref(),
            Some("Download failed: network unreachable")
        );
        assert_eq!(scratch_entries(root.path())?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_artifact_maps_to_not_found() -> Result<()> {
        let root = tempfile::tempdir()?;
        let stub = StubFetcher::new(StubBehavior::WriteNothing);
        let server = server_with(stub, root.path())?;

        let response = server
            .router()
            .clone()
            .oneshot(download_request("https://example.com/ghost")?)
            .await?;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let problem = problem_body(response).await?;
        assert_eq!(problem.detail.as_deref(), Some("File not found after download"));
        assert_eq!(scratch_entries(root.path())?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_url_parameter_is_rejected() -> Result<()> {
        let root = tempfile::tempdir()?;
        let stub = StubFetcher::new(StubBehavior::WriteNothing);
        let server = server_with(Arc::clone(&stub), root.path())?;

        let response = server
            .router()
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .uri("/download")
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(stub.seen_destinations().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_requests_use_distinct_scratch_paths() -> Result<()> {
        let root = tempfile::tempdir()?;
        let bytes_a = vec![1_u8; 600];
        let bytes_b = vec![2_u8; 900];
        let stub = StubFetcher::new(StubBehavior::WritePerUrl(HashMap::from([
            ("https://example.com/a".to_string(), bytes_a.clone()),
            ("https://example.com/b".to_string(), bytes_b.clone()),
        ])));
        let server = server_with(Arc::clone(&stub), root.path())?;

        let router = server.router().clone();
        let (first, second) = tokio::join!(
            router
                .clone()
                .oneshot(download_request("https://example.com/a")?),
            router.oneshot(download_request("https://example.com/b")?),
        );

        let first = first?;
        let second = second?;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(
            to_bytes(first.into_body(), BODY_LIMIT).await?.as_ref(),
            bytes_a.as_slice()
        );
        assert_eq!(
            to_bytes(second.into_body(), BODY_LIMIT).await?.as_ref(),
            bytes_b.as_slice()
        );

        let destinations = stub.seen_destinations();
        assert_eq!(destinations.len(), 2);
        assert_ne!(destinations[0], destinations[1]);
        assert_eq!(scratch_entries(root.path())?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn download_outcomes_reach_the_metrics_endpoint() -> Result<()> {
        let root = tempfile::tempdir()?;
        let stub = StubFetcher::new(StubBehavior::Fail("boom".to_string()));
        let server = server_with(stub, root.path())?;
        let router = server.router().clone();

        let response = router
            .clone()
            .oneshot(download_request("https://example.com/x")?)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let metrics_response = router
            .oneshot(HttpRequest::builder().uri("/metrics").body(Body::empty())?)
            .await?;
        assert_eq!(metrics_response.status(), StatusCode::OK);
        let rendered = to_bytes(metrics_response.into_body(), BODY_LIMIT).await?;
        let rendered = String::from_utf8(rendered.to_vec())?;
        assert!(rendered.contains("outcome=\"fetch_failed\""));
        Ok(())
    }

    #[tokio::test]
    async fn health_reports_scratch_root_state() -> Result<()> {
        let root = tempfile::tempdir()?;
        let stub = StubFetcher::new(StubBehavior::WriteNothing);
        let server = server_with(stub, root.path())?;
        let router = server.router().clone();

        let healthy = router
            .clone()
            .oneshot(HttpRequest::builder().uri("/health").body(Body::empty())?)
            .await?;
        assert_eq!(healthy.status(), StatusCode::OK);

        let path = root.path().to_path_buf();
        drop(root);
        assert!(!path.exists());
        let degraded = router
            .oneshot(HttpRequest::builder().uri("/health").body(Body::empty())?)
            .await?;
        assert_eq!(degraded.status(), StatusCode::SERVICE_UNAVAILABLE);
        Ok(())
    }
}
