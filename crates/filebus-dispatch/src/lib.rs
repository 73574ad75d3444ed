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

//! Session-bus dispatcher turning file-operation requests into addressable jobs.
//!
//! Layout: `normalize.rs` (canonical references), `request.rs` (wire requests and resolution),
//! `templates.rs` (templates directory), `bridge.rs` (UI delegates), `installer.rs` (publication),
//! `dispatcher.rs` (pipeline), `service.rs` (bus interface), `session.rs` (zbus-backed `JobBus`),
//! `error.rs`.

pub mod bridge;
pub mod dispatcher;
pub mod error;
pub mod installer;
pub mod normalize;
pub mod request;
pub mod service;
pub mod session;
pub mod templates;

pub use dispatcher::{DispatchSettings, Dispatcher};
pub use error::{DispatchError, DispatchResult, NormalizeError, NormalizeResult};
pub use normalize::normalize;
pub use request::{DESKTOP_ENTRY_SUFFIX, OperationRequest, ResolvedRequest, TransferArgs};
pub use service::{OPERATIONS_INTERFACE, OperationBackend, WireAddress};
pub use session::SessionBus;
pub use templates::TemplateLocator;
