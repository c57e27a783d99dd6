//! Shared HTTP constants (headers, problem URIs, fixed response metadata).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const PROBLEM_INTERNAL: &str = "https://ripwire.dev/problems/internal";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://ripwire.dev/problems/bad-request";
pub(crate) const PROBLEM_NOT_FOUND: &str = "https://ripwire.dev/problems/not-found";
pub(crate) const PROBLEM_SERVICE_UNAVAILABLE: &str =
    "https://ripwire.dev/problems/service-unavailable";

/// Content type declared on every successful download response.
pub(crate) const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Filename presented to the caller regardless of the source title.
pub(crate) const DOWNLOAD_FILENAME: &str = "music.mp3";
