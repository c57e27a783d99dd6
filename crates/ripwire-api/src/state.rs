//! Shared handler state for the API surface.

use std::path::PathBuf;

use ripwire_fetch::SharedFetcher;
use ripwire_telemetry::Metrics;

pub(crate) struct ApiState {
    pub(crate) fetcher: SharedFetcher,
    pub(crate) scratch_root: PathBuf,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    pub(crate) const fn new(
        fetcher: SharedFetcher,
        scratch_root: PathBuf,
        telemetry: Metrics,
    ) -> Self {
        Self {
            fetcher,
            scratch_root,
            telemetry,
        }
    }
}
