//! Request pipeline: resolve, bridge, build, install.

use std::sync::Arc;

use filebus_config::{ConfirmationPolicy, DispatchConfig};
use filebus_jobs::{JobAddress, JobBus, JobFactory, build_job};
use tracing::{debug, instrument};
use zbus::zvariant::OwnedObjectPath;

use crate::bridge::bridge;
use crate::error::{DispatchError, DispatchResult};
use crate::installer::install;
use crate::request::{OperationRequest, ResolvedRequest};
use crate::templates::TemplateLocator;

/// Settings fixed for the lifetime of a dispatcher.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Object path placed in the sentinel address.
    pub sentinel_path: OwnedObjectPath,
    /// Handling of confirmation requests that cannot reach a UI handler.
    pub confirmation: ConfirmationPolicy,
    /// Source of the templates directory.
    pub templates: TemplateLocator,
}

impl DispatchSettings {
    /// Derive settings from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &DispatchConfig) -> Self {
        Self {
            sentinel_path: config.bus.object_path.clone(),
            confirmation: config.confirmation,
            templates: TemplateLocator::new(config.template_dir.clone()),
        }
    }
}

/// Turns requests into installed jobs.
pub struct Dispatcher {
    bus: Arc<dyn JobBus>,
    engine: Arc<dyn JobFactory>,
    settings: DispatchSettings,
}

impl Dispatcher {
    /// Dispatcher publishing jobs built by `engine` on `bus`.
    #[must_use]
    pub fn new(
        bus: Arc<dyn JobBus>,
        engine: Arc<dyn JobFactory>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            bus,
            engine,
            settings,
        }
    }

    /// Address returned to callers when no job was installed.
    #[must_use]
    pub fn sentinel(&self) -> JobAddress {
        JobAddress::sentinel(&self.settings.sentinel_path)
    }

    /// Run one request through the pipeline.
    ///
    /// The call returns as soon as the job is published; it never waits for the job's work.
    ///
    /// # Errors
    ///
    /// Returns the first failure among path normalization, argument validation, the
    /// confirmation policy, the engine and the bus.
    #[instrument(name = "dispatcher.dispatch", skip_all, fields(operation = %request.kind()))]
    pub async fn dispatch(&self, request: OperationRequest) -> DispatchResult<JobAddress> {
        let operation = request.kind();
        debug!("dispatching request");

        let ResolvedRequest { descriptor, ui } = request.resolve(&self.settings.templates)?;

        let delegate = match ui {
            Some(identity) if operation.accepts_delegate() => {
                bridge(self.bus.as_ref(), operation, &identity).await
            }
            _ => None,
        };
        if delegate.is_none()
            && descriptor.confirmation_requested()
            && self.settings.confirmation == ConfirmationPolicy::FailClosed
        {
            return Err(DispatchError::ConfirmationUnavailable { operation });
        }

        let job = build_job(self.engine.as_ref(), descriptor, delegate);
        install(self.bus.as_ref(), operation, job).await
    }
}
