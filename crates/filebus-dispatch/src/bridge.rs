//! Best-effort binding of caller-side UI handlers.

use filebus_jobs::{DelegateIdentity, JobBus, MaybeDelegate, OperationKind};
use tracing::warn;

/// Bind a UI delegate for `identity`, or `None` when the bus cannot.
///
/// Failure only costs the job its ability to prompt, so it is logged and swallowed.
pub async fn bridge(
    bus: &dyn JobBus,
    operation: OperationKind,
    identity: &DelegateIdentity,
) -> MaybeDelegate {
    match bus.ui_delegate(identity).await {
        Ok(delegate) => Some(delegate),
        Err(err) => {
            warn!(
                error = %err,
                source_error = ?std::error::Error::source(&err),
                operation = %operation,
                ui = %identity,
                "failed to bind ui delegate; continuing without prompts"
            );
            None
        }
    }
}
