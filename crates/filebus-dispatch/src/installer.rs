//! Publication of engine jobs on the bus.

use filebus_jobs::{BoxedJob, JobAddress, JobBus, JobResult, OperationKind};
use tracing::{debug, warn};

use crate::error::{DispatchError, DispatchResult};

/// Publish the job the engine built, if it built one.
///
/// # Errors
///
/// [`DispatchError::NilJob`] when the engine refused, [`DispatchError::Install`] when the bus
/// could not export the job.
pub async fn install(
    bus: &dyn JobBus,
    operation: OperationKind,
    job: JobResult<BoxedJob>,
) -> DispatchResult<JobAddress> {
    let job = job.map_err(|source| {
        warn!(
            error = %source,
            operation = %operation,
            "cannot install a job the engine did not produce"
        );
        DispatchError::NilJob { operation, source }
    })?;

    let address = bus.install(job).await.map_err(|source| {
        warn!(
            error = %source,
            source_error = ?std::error::Error::source(&source),
            operation = %operation,
            "failed to install job on the bus"
        );
        DispatchError::Install { operation, source }
    })?;

    debug!(
        operation = %operation,
        destination = %address.destination,
        object_path = %address.object_path.as_str(),
        interface = %address.interface,
        "job installed"
    );
    Ok(address)
}
