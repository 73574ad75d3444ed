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

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (addresses and identities), mocks.rs (engine, bus and delegate doubles).

pub mod fixtures;
pub mod mocks;

pub use mocks::{MemoryBus, RecordedCall, RecordingEngine, ScriptedDelegate, StubJob};
