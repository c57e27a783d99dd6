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

//! Application bootstrap for the Ripwire audio extraction service.
//!
//! Layout: `bootstrap.rs` (dependency wiring and the boot sequence),
//! `error.rs` (application errors).

mod bootstrap;
mod error;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
