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

//! Environment-driven runtime settings for the Ripwire service.
//!
//! Layout: `model.rs` (typed settings), `loader.rs` (env parsing and
//! validation), `error.rs` (configuration errors).

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::{Settings, load_from_env};
pub use model::{FetchSettings, HttpSettings};
