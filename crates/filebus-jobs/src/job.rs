//! The opaque unit of work produced by an operation engine.

use async_trait::async_trait;
use zbus::object_server::ObjectServer;

use crate::model::{JobAddress, OperationKind};

/// A constructed, not yet published job.
///
/// The dispatcher only ever asks a job where it wants to live and then hands it to the bus; the
/// job's own methods (start, cancel, progress) belong to the engine.
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Operation kind this job performs.
    fn kind(&self) -> OperationKind;

    /// Address the job will be reachable at once exported.
    fn bus_info(&self) -> JobAddress;

    /// Register the job on `server` at the object path reported by [`Job::bus_info`].
    ///
    /// Returns `Ok(false)` when the path is already taken, mirroring
    /// [`ObjectServer::at`].
    async fn export(self: Box<Self>, server: &ObjectServer) -> zbus::Result<bool>;
}
