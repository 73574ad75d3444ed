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

//! Telemetry primitives shared across the filebus workspace.
//!
//! Layout: `init.rs` (subscriber setup), `context.rs` (process span), `error.rs`.

pub mod context;
pub mod error;
pub mod init;

pub use context::{GlobalContextGuard, record_bus_name};
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
