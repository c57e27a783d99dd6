//! Audio download endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::Response,
};
use ripwire_fetch::ScratchFile;
use ripwire_telemetry::DownloadOutcome;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::http::constants::{AUDIO_CONTENT_TYPE, DOWNLOAD_FILENAME};
use crate::http::errors::ApiError;
use crate::state::ApiState;

#[derive(Debug, Deserialize)]
pub(crate) struct DownloadParams {
    url: Option<String>,
}

/// Fetch the best audio track for `url`, transcoded to MP3, and return it.
///
/// The scratch file is reserved under a request-unique name and removed on
/// every exit path once the response bytes have been captured. The fetch
/// itself is a blocking, long-running operation with no retries: any
/// collaborator failure surfaces immediately as a 400, and a clean
/// collaborator return without an artifact surfaces as a 404.
pub(crate) async fn download(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let url = params
        .url
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("missing required query parameter: url"))?;

    let _in_flight = state.telemetry.download_started();
    let scratch = ScratchFile::create(&state.scratch_root);
    info!(url = %url, target = %scratch.path().display(), "starting audio fetch");

    if let Err(err) = state.fetcher.fetch(&url, scratch.path()).await {
        state.telemetry.inc_download(DownloadOutcome::FetchFailed);
        warn!(url = %url, error = %err, "fetch collaborator failed");
        return Err(ApiError::bad_request(format!("Download failed: {err}")));
    }

    if !scratch.exists() {
        state.telemetry.inc_download(DownloadOutcome::MissingArtifact);
        warn!(url = %url, target = %scratch.path().display(), "collaborator succeeded but left no artifact");
        return Err(ApiError::not_found("File not found after download"));
    }

    let bytes = scratch.read().await.map_err(|err| {
        error!(target = %scratch.path().display(), error = %err, "failed to read produced artifact");
        ApiError::internal("failed to read produced artifact")
    })?;
    state.telemetry.inc_download(DownloadOutcome::Ok);
    info!(url = %url, size = bytes.len(), "audio fetch complete");

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, AUDIO_CONTENT_TYPE)
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
        )
        .body(Body::from(bytes))
        .map_err(|err| {
            error!(error = %err, "failed to build download response");
            ApiError::internal("failed to build download response")
        })
}
