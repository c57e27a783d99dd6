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

//! HTTP delivery surface for the Ripwire audio extraction service.
//!
//! Layout: `http/` (router, handlers, problem responses, metrics middleware),
//! `state.rs` (shared handler state), `error.rs` (server bootstrap errors).

pub mod error;
pub mod http;
mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
