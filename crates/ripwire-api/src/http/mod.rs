//! HTTP surface modules (router, handlers, problem responses).

/// Shared constants and header names for the HTTP surface.
pub mod constants;
/// Download endpoint handler.
pub mod download;
/// Problem response helpers and error types.
pub mod errors;
/// Health and diagnostics endpoints.
pub mod health;
/// Router construction and server host.
pub mod router;
/// Metrics middleware for HTTP requests.
pub mod telemetry;
