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

//! Engine-agnostic job interfaces shared by the dispatcher and operation engines.
//!
//! Layout: `model.rs` (addresses, kinds, flags), `job.rs` (`Job`), `factory.rs` (`JobFactory`,
//! `JobDescriptor`, `build_job`), `delegate.rs` (`UiDelegate`), `bus.rs` (`JobBus`),
//! `error.rs` (error types).

pub mod bus;
pub mod delegate;
pub mod error;
pub mod factory;
pub mod job;
pub mod model;

pub use bus::JobBus;
pub use delegate::{Prompt, ResponseCode, UiDelegate, UiFlags, UiResponse};
pub use error::{BusError, BusResult, DelegateError, DelegateResult, JobError, JobResult};
pub use factory::{BoxedJob, JobDescriptor, JobFactory, MaybeDelegate, TransferRequest, build_job};
pub use job::Job;
pub use model::{
    DelegateIdentity, JobAddress, JobAddressAllocator, ListFlags, OperationKind, TransferFlags,
};
