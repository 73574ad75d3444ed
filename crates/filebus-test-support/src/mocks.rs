//! In-memory doubles for the engine, the bus and UI delegates.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use filebus_jobs::{
    BoxedJob, BusError, BusResult, DelegateIdentity, DelegateResult, Job, JobAddress,
    JobAddressAllocator, JobBus, JobDescriptor, JobError, JobFactory, JobResult, ListFlags,
    MaybeDelegate, OperationKind, Prompt, ResponseCode, TransferRequest, UiDelegate, UiFlags,
    UiResponse,
};
use url::Url;
use zbus::object_server::ObjectServer;

use crate::fixtures::job_allocator;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Bus object exported for a [`StubJob`].
struct StubJobObject {
    kind: OperationKind,
}

#[zbus::interface(name = "org.filebus.StubJob")]
impl StubJobObject {
    #[zbus(property)]
    fn kind(&self) -> String {
        self.kind.as_str().to_string()
    }
}

/// Minimal job that exports a property-only object when installed.
#[derive(Debug, Clone)]
pub struct StubJob {
    kind: OperationKind,
    address: JobAddress,
}

impl StubJob {
    /// Job of `kind` reachable at `address`.
    #[must_use]
    pub const fn new(kind: OperationKind, address: JobAddress) -> Self {
        Self { kind, address }
    }
}

#[async_trait]
impl Job for StubJob {
    fn kind(&self) -> OperationKind {
        self.kind
    }

    fn bus_info(&self) -> JobAddress {
        self.address.clone()
    }

    async fn export(self: Box<Self>, server: &ObjectServer) -> zbus::Result<bool> {
        let path = self.address.object_path.as_str().to_string();
        server
            .at(path.as_str(), StubJobObject { kind: self.kind })
            .await
    }
}

/// One factory invocation seen by [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Resolved request rebuilt from the constructor arguments.
    pub descriptor: JobDescriptor,
    /// Whether a UI delegate was handed over.
    pub has_delegate: bool,
}

/// Engine that records every constructor call and answers with [`StubJob`]s.
pub struct RecordingEngine {
    allocator: JobAddressAllocator,
    refused: HashSet<OperationKind>,
    refuse_all: bool,
    calls: Mutex<Vec<RecordedCall>>,
    delegates: Mutex<Vec<Box<dyn UiDelegate>>>,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingEngine {
    /// Engine that builds a job for every kind.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: job_allocator(),
            refused: HashSet::new(),
            refuse_all: false,
            calls: Mutex::new(Vec::new()),
            delegates: Mutex::new(Vec::new()),
        }
    }

    /// Engine that returns no job for any kind.
    #[must_use]
    pub fn refusing() -> Self {
        Self {
            refuse_all: true,
            ..Self::new()
        }
    }

    /// Refuse to build jobs of `kind`.
    #[must_use]
    pub fn refuse(mut self, kind: OperationKind) -> Self {
        self.refused.insert(kind);
        self
    }

    /// Snapshot of the calls seen so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// The last call, if any.
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        lock(&self.calls).last().cloned()
    }

    /// Remove and return the most recently received delegate.
    #[must_use]
    pub fn take_delegate(&self) -> Option<Box<dyn UiDelegate>> {
        lock(&self.delegates).pop()
    }

    fn record(&self, descriptor: JobDescriptor, delegate: MaybeDelegate) -> JobResult<BoxedJob> {
        let kind = descriptor.kind();
        lock(&self.calls).push(RecordedCall {
            descriptor,
            has_delegate: delegate.is_some(),
        });
        if let Some(delegate) = delegate {
            lock(&self.delegates).push(delegate);
        }
        if self.refuse_all || self.refused.contains(&kind) {
            return Err(JobError::Unsupported { operation: kind });
        }
        let address = self
            .allocator
            .allocate(kind, format!("org.filebus.{}", kind.job_name()))?;
        Ok(Box::new(StubJob::new(kind, address)))
    }
}

impl JobFactory for RecordingEngine {
    fn new_list_job(&self, target: Url, flags: ListFlags) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::List { target, flags }, None)
    }

    fn new_stat_job(&self, target: Url) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::Stat { target }, None)
    }

    fn new_delete_job(
        &self,
        targets: Vec<Url>,
        should_confirm: bool,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        self.record(
            JobDescriptor::Delete {
                targets,
                should_confirm,
            },
            delegate,
        )
    }

    fn new_trash_job(
        &self,
        targets: Vec<Url>,
        should_confirm: bool,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        self.record(
            JobDescriptor::Trash {
                targets,
                should_confirm,
            },
            delegate,
        )
    }

    fn new_empty_trash_job(
        &self,
        should_confirm: bool,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::EmptyTrash { should_confirm }, delegate)
    }

    fn new_chmod_job(&self, target: Url, permission: u32) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::Chmod { target, permission }, None)
    }

    fn new_chown_job(&self, target: Url, owner: String, group: String) -> JobResult<BoxedJob> {
        self.record(
            JobDescriptor::Chown {
                target,
                owner,
                group,
            },
            None,
        )
    }

    fn new_create_file_job(
        &self,
        dest_dir: Url,
        file_name: String,
        content: Vec<u8>,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        self.record(
            JobDescriptor::CreateFile {
                dest_dir,
                file_name,
                content,
            },
            delegate,
        )
    }

    fn new_create_directory_job(
        &self,
        dest_dir: Url,
        dir_name: String,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::CreateDirectory { dest_dir, dir_name }, delegate)
    }

    fn new_create_file_from_template_job(
        &self,
        dest_dir: Url,
        template: Url,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        self.record(
            JobDescriptor::CreateFileFromTemplate { dest_dir, template },
            delegate,
        )
    }

    fn new_link_job(
        &self,
        source: Url,
        dest_dir: Url,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::Link { source, dest_dir }, delegate)
    }

    fn new_rename_job(&self, target: Url, new_name: String) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::Rename { target, new_name }, None)
    }

    fn new_get_default_launch_app_job(
        &self,
        target: Url,
        must_support_uri: bool,
    ) -> JobResult<BoxedJob> {
        self.record(
            JobDescriptor::GetDefaultLaunchApp {
                target,
                must_support_uri,
            },
            None,
        )
    }

    fn new_get_recommended_launch_apps_job(&self, target: Url) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::GetRecommendedLaunchApps { target }, None)
    }

    fn new_get_all_launch_apps_job(&self) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::GetAllLaunchApps, None)
    }

    fn new_set_default_launch_app_job(
        &self,
        desktop_id: String,
        mime_type: String,
    ) -> JobResult<BoxedJob> {
        self.record(
            JobDescriptor::SetDefaultLaunchApp {
                desktop_id,
                mime_type,
            },
            None,
        )
    }

    fn new_copy_job(
        &self,
        request: TransferRequest,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::Copy(request), delegate)
    }

    fn new_move_job(
        &self,
        request: TransferRequest,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::Move(request), delegate)
    }

    fn new_get_template_job(&self, template_dir: Url) -> JobResult<BoxedJob> {
        self.record(JobDescriptor::GetTemplate { template_dir }, None)
    }
}

/// In-memory [`JobBus`] that records installs and bridged identities.
#[derive(Default)]
pub struct MemoryBus {
    fail_installs: bool,
    fail_bridging: bool,
    installed: Mutex<Vec<(OperationKind, JobAddress)>>,
    taken: Mutex<HashSet<String>>,
    bridged: Mutex<Vec<DelegateIdentity>>,
}

impl MemoryBus {
    /// Bus that accepts every well-formed install and identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every install with a transport error.
    #[must_use]
    pub const fn failing_installs(mut self) -> Self {
        self.fail_installs = true;
        self
    }

    /// Refuse to bind any UI delegate.
    #[must_use]
    pub const fn failing_bridging(mut self) -> Self {
        self.fail_bridging = true;
        self
    }

    /// Addresses installed so far, with the kind of the installed job.
    #[must_use]
    pub fn installed(&self) -> Vec<(OperationKind, JobAddress)> {
        lock(&self.installed).clone()
    }

    /// Identities for which a delegate was bound.
    #[must_use]
    pub fn bridged(&self) -> Vec<DelegateIdentity> {
        lock(&self.bridged).clone()
    }
}

#[async_trait]
impl JobBus for MemoryBus {
    async fn install(&self, job: Box<dyn Job>) -> BusResult<JobAddress> {
        let address = job.bus_info();
        let object_path = address.object_path.as_str().to_string();
        if self.fail_installs {
            return Err(BusError::Export {
                object_path,
                source: zbus::Error::Failure("memory bus refuses installs".to_string()),
            });
        }
        if !lock(&self.taken).insert(object_path.clone()) {
            return Err(BusError::AddressInUse { object_path });
        }
        lock(&self.installed).push((job.kind(), address.clone()));
        Ok(address)
    }

    async fn ui_delegate(&self, identity: &DelegateIdentity) -> BusResult<Box<dyn UiDelegate>> {
        if self.fail_bridging || identity.destination.is_empty() {
            return Err(BusError::InvalidDelegate {
                field: "destination",
                value: identity.destination.clone(),
                source: zbus::Error::Failure("memory bus refuses delegate".to_string()),
            });
        }
        lock(&self.bridged).push(identity.clone());
        Ok(Box::new(ScriptedDelegate::new()))
    }
}

/// Delegate answering from a script; falls back to cancel when the script runs dry.
pub struct ScriptedDelegate {
    confirm: bool,
    responses: Mutex<VecDeque<UiResponse>>,
    asked: Mutex<Vec<&'static str>>,
}

impl Default for ScriptedDelegate {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDelegate {
    /// Delegate that confirms deletions and cancels every other prompt.
    #[must_use]
    pub fn new() -> Self {
        Self {
            confirm: true,
            responses: Mutex::new(VecDeque::new()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Set the answer to delete confirmations.
    #[must_use]
    pub const fn confirming(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    /// Queue an answer for the next dialog.
    #[must_use]
    pub fn then(self, code: ResponseCode, apply_to_all: bool) -> Self {
        lock(&self.responses).push_back(UiResponse {
            code,
            apply_to_all,
            user_data: String::new(),
        });
        self
    }

    /// Names of the prompts asked so far.
    #[must_use]
    pub fn asked(&self) -> Vec<&'static str> {
        lock(&self.asked).clone()
    }

    fn answer(&self, method: &'static str) -> UiResponse {
        lock(&self.asked).push(method);
        lock(&self.responses).pop_front().unwrap_or(UiResponse {
            code: ResponseCode::Cancel,
            apply_to_all: false,
            user_data: String::new(),
        })
    }
}

#[async_trait]
impl UiDelegate for ScriptedDelegate {
    async fn ask_delete_confirmation(&self, _prompt: &Prompt) -> DelegateResult<bool> {
        lock(&self.asked).push("AskDeleteConfirmation");
        Ok(self.confirm)
    }

    async fn ask_delete(&self, _prompt: &Prompt, _flags: UiFlags) -> DelegateResult<UiResponse> {
        Ok(self.answer("AskDelete"))
    }

    async fn ask_retry(&self, _prompt: &Prompt, _flags: UiFlags) -> DelegateResult<UiResponse> {
        Ok(self.answer("AskRetry"))
    }

    async fn ask_skip(&self, _prompt: &Prompt, _flags: UiFlags) -> DelegateResult<UiResponse> {
        Ok(self.answer("AskSkip"))
    }

    async fn conflict_dialog(&self) -> DelegateResult<UiResponse> {
        Ok(self.answer("ConflictDialog"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{broken_identity, ui_identity};
    use filebus_jobs::build_job;

    fn file(raw: &str) -> Url {
        Url::parse(raw).expect("valid url")
    }

    #[tokio::test]
    async fn engine_records_and_bus_installs() -> Result<(), Box<dyn std::error::Error>> {
        let engine = RecordingEngine::new();
        let bus = MemoryBus::new();
        let job = build_job(
            &engine,
            JobDescriptor::Stat {
                target: file("file:///tmp/a"),
            },
            None,
        )?;
        let address = bus.install(job).await?;

        assert!(address.is_installed());
        assert_eq!(address.interface, "org.filebus.StatJob");
        assert_eq!(bus.installed().len(), 1);
        assert_eq!(
            engine.last_call().map(|call| call.descriptor.kind()),
            Some(OperationKind::Stat)
        );
        Ok(())
    }

    #[tokio::test]
    async fn refusals_and_failures_surface_as_errors() {
        let engine = RecordingEngine::new().refuse(OperationKind::Rename);
        let refused = engine.new_rename_job(file("file:///tmp/a"), "b".to_string());
        assert!(matches!(
            refused,
            Err(JobError::Unsupported {
                operation: OperationKind::Rename
            })
        ));
        assert_eq!(engine.calls().len(), 1);

        let bus = MemoryBus::new().failing_installs();
        let job = RecordingEngine::new()
            .new_get_all_launch_apps_job()
            .expect("stub job");
        assert!(matches!(
            bus.install(job).await,
            Err(BusError::Export { .. })
        ));
    }

    #[tokio::test]
    async fn bus_rejects_reused_paths_and_broken_identities() {
        let bus = MemoryBus::new();
        let address = job_allocator()
            .allocate(OperationKind::List, "org.filebus.ListJob")
            .expect("address");
        let first = Box::new(StubJob::new(OperationKind::List, address.clone()));
        let second = Box::new(StubJob::new(OperationKind::List, address));
        assert!(bus.install(first).await.is_ok());
        assert!(matches!(
            bus.install(second).await,
            Err(BusError::AddressInUse { .. })
        ));

        assert!(bus.ui_delegate(&ui_identity()).await.is_ok());
        assert!(bus.ui_delegate(&broken_identity()).await.is_err());
        assert_eq!(bus.bridged(), vec![ui_identity()]);
    }

    #[tokio::test]
    async fn scripted_delegate_replays_answers() -> DelegateResult<()> {
        let delegate = ScriptedDelegate::new()
            .confirming(false)
            .then(ResponseCode::Skip, true);
        let prompt = Prompt::new("Copy failed", "Skip?", "/tmp/a");

        assert!(!delegate.ask_delete_confirmation(&prompt).await?);
        let first = delegate.ask_skip(&prompt, UiFlags::MULTI).await?;
        assert_eq!(first.code, ResponseCode::Skip);
        assert!(first.apply_to_all);
        let fallback = delegate.conflict_dialog().await?;
        assert_eq!(fallback.code, ResponseCode::Cancel);
        assert_eq!(
            delegate.asked(),
            vec!["AskDeleteConfirmation", "AskSkip", "ConflictDialog"]
        );
        Ok(())
    }
}
