//! Process-wide span context.
//!
//! # Design
//! - Provides an application-level span guard so every event carries the service role and build.
//! - Per-request spans are opened by the dispatcher with the operation kind as a field.

use tracing::{Span, span::Entered};

use crate::init::build_sha;

/// Guard that keeps the application-level span entered for the lifetime of the process.
pub struct GlobalContextGuard {
    _guard: Entered<'static>,
}

impl GlobalContextGuard {
    #[must_use]
    /// Enter the application-level tracing span for the lifetime of the guard.
    pub fn new(role: impl Into<String>) -> Self {
        let role = role.into();
        let span: &'static Span = Box::leak(Box::new(
            tracing::info_span!(
                "filebus",
                role = %role,
                build_sha = %build_sha(),
                bus_name = tracing::field::Empty
            ),
        ));
        let guard = span.enter();
        Self { _guard: guard }
    }
}

/// Record the serving bus name on the active span.
pub fn record_bus_name(name: &str) {
    Span::current().record("bus_name", tracing::field::display(name));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_and_recording_work_without_a_subscriber() {
        let _guard = GlobalContextGuard::new("dispatcher");
        record_bus_name("org.filebus.Operations");
    }
}
