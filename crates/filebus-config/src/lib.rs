#![forbid(unsafe_code)]
#![deny(
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
#![allow(clippy::module_name_repetitions)]

//! Layered configuration for the filebus dispatcher.
//!
//! Layout: `defaults.rs` (identity and env names), `model.rs` (typed models),
//! `validate.rs` (override parsing), `loader.rs` (defaults, file, environment).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{apply_env_overrides, default_config_path, from_file, load, load_with};
pub use model::{BusConfig, ConfirmationPolicy, DispatchConfig, LogFormatSetting, LoggingSettings};
