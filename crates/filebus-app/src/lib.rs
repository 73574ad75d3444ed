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

//! Filebus application bootstrap wiring.
//!
//! Engines link this crate and hand their [`filebus_jobs::JobFactory`] to [`run_app`] from their
//! own `main`.
//!
//! Layout: `bootstrap.rs` (service wiring), `error.rs`.

/// Application bootstrap and lifecycle.
pub mod bootstrap;
/// Application-level errors.
pub mod error;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
