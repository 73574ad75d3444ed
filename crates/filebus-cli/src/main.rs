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

//! Binary entrypoint for the `filebus` command.

use std::process;

/// Runs the requested command and exits with its status.
#[tokio::main]
async fn main() {
    process::exit(filebus_cli::run().await);
}
