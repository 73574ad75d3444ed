//! Seam between the dispatcher and the inter-process bus.

use async_trait::async_trait;

use crate::delegate::UiDelegate;
use crate::error::BusResult;
use crate::job::Job;
use crate::model::{DelegateIdentity, JobAddress};

/// Bus operations the dispatcher relies on.
#[async_trait]
pub trait JobBus: Send + Sync {
    /// Publish `job` so its own methods become remotely invokable, returning the address it was
    /// published at.
    async fn install(&self, job: Box<dyn Job>) -> BusResult<JobAddress>;

    /// Bind a UI delegate capability to a caller-side handler.
    async fn ui_delegate(&self, identity: &DelegateIdentity) -> BusResult<Box<dyn UiDelegate>>;
}
