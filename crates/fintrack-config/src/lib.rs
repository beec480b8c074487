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
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! File-backed client configuration for Fintrack.
//!
//! Layout: `model.rs` (typed configuration sections), `defaults.rs` (built-in
//! values), `validate.rs` (field checks), `loader.rs` (JSON file loading and
//! overrides), `error.rs` (`ConfigError`).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigOverrides, load_config};
pub use model::{ApiSettings, ClientConfig, LogFormatSetting, LoggingSettings, PresentationSettings};
