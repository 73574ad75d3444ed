//! Job constructors implemented by operation engines.
//!
//! # Design
//! - One constructor per operation kind; every constructor defaults to
//!   [`JobError::Unsupported`] so engines only override what they implement.
//! - [`JobDescriptor`] is the resolved request: normalized references and typed parameters.
//! - [`build_job`] is the single place that maps a descriptor onto a constructor.

use url::Url;

use crate::delegate::UiDelegate;
use crate::error::{JobError, JobResult};
use crate::job::Job;
use crate::model::{ListFlags, OperationKind, TransferFlags};

/// Boxed job handed from an engine to the installer.
pub type BoxedJob = Box<dyn Job>;

/// Optional UI capability owned by the job it is passed to.
pub type MaybeDelegate = Option<Box<dyn UiDelegate>>;

/// Parameters shared by copy and move jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Files to transfer.
    pub sources: Vec<Url>,
    /// Destination directory; `None` lets the engine pick (e.g. duplicate in place).
    pub dest_dir: Option<Url>,
    /// New name for a single transferred file; empty keeps the source name.
    pub target_name: String,
    /// Transfer options.
    pub flags: TransferFlags,
}

/// Fully resolved job request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobDescriptor {
    /// Enumerate a directory.
    List {
        /// Directory to enumerate.
        target: Url,
        /// Enumeration options.
        flags: ListFlags,
    },
    /// Query metadata.
    Stat {
        /// File to inspect.
        target: Url,
    },
    /// Delete files permanently.
    Delete {
        /// Files to delete.
        targets: Vec<Url>,
        /// Ask the user before deleting.
        should_confirm: bool,
    },
    /// Move files to the trash.
    Trash {
        /// Files to trash.
        targets: Vec<Url>,
        /// Ask the user before trashing.
        should_confirm: bool,
    },
    /// Empty the trash.
    EmptyTrash {
        /// Ask the user before emptying.
        should_confirm: bool,
    },
    /// Change permissions.
    Chmod {
        /// File to modify.
        target: Url,
        /// New permission bits.
        permission: u32,
    },
    /// Change ownership.
    Chown {
        /// File to modify.
        target: Url,
        /// New owner name.
        owner: String,
        /// New group name.
        group: String,
    },
    /// Create a file.
    CreateFile {
        /// Directory receiving the file.
        dest_dir: Url,
        /// Name of the new file.
        file_name: String,
        /// Initial content.
        content: Vec<u8>,
    },
    /// Create a directory.
    CreateDirectory {
        /// Directory receiving the new directory.
        dest_dir: Url,
        /// Name of the new directory.
        dir_name: String,
    },
    /// Instantiate a template.
    CreateFileFromTemplate {
        /// Directory receiving the file.
        dest_dir: Url,
        /// Template to copy.
        template: Url,
    },
    /// Create a symbolic link.
    Link {
        /// Link target.
        source: Url,
        /// Directory receiving the link.
        dest_dir: Url,
    },
    /// Rename in place.
    Rename {
        /// File to rename.
        target: Url,
        /// New file name.
        new_name: String,
    },
    /// Resolve the default application.
    GetDefaultLaunchApp {
        /// File to open.
        target: Url,
        /// Only consider applications that accept URIs.
        must_support_uri: bool,
    },
    /// Resolve recommended applications.
    GetRecommendedLaunchApps {
        /// File to open.
        target: Url,
    },
    /// Enumerate every application.
    GetAllLaunchApps,
    /// Set the default application for a MIME type.
    SetDefaultLaunchApp {
        /// Desktop entry identifier, ending in `.desktop`.
        desktop_id: String,
        /// MIME type to associate.
        mime_type: String,
    },
    /// Copy files.
    Copy(TransferRequest),
    /// Move files.
    Move(TransferRequest),
    /// Enumerate templates.
    GetTemplate {
        /// Templates directory.
        template_dir: Url,
    },
}

impl JobDescriptor {
    /// Operation kind described by this request.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::List { .. } => OperationKind::List,
            Self::Stat { .. } => OperationKind::Stat,
            Self::Delete { .. } => OperationKind::Delete,
            Self::Trash { .. } => OperationKind::Trash,
            Self::EmptyTrash { .. } => OperationKind::EmptyTrash,
            Self::Chmod { .. } => OperationKind::Chmod,
            Self::Chown { .. } => OperationKind::Chown,
            Self::CreateFile { .. } => OperationKind::CreateFile,
            Self::CreateDirectory { .. } => OperationKind::CreateDirectory,
            Self::CreateFileFromTemplate { .. } => OperationKind::CreateFileFromTemplate,
            Self::Link { .. } => OperationKind::Link,
            Self::Rename { .. } => OperationKind::Rename,
            Self::GetDefaultLaunchApp { .. } => OperationKind::GetDefaultLaunchApp,
            Self::GetRecommendedLaunchApps { .. } => OperationKind::GetRecommendedLaunchApps,
            Self::GetAllLaunchApps => OperationKind::GetAllLaunchApps,
            Self::SetDefaultLaunchApp { .. } => OperationKind::SetDefaultLaunchApp,
            Self::Copy(_) => OperationKind::Copy,
            Self::Move(_) => OperationKind::Move,
            Self::GetTemplate { .. } => OperationKind::GetTemplate,
        }
    }

    /// Whether the caller asked to be prompted before the job touches anything.
    #[must_use]
    pub const fn confirmation_requested(&self) -> bool {
        match self {
            Self::Delete { should_confirm, .. }
            | Self::Trash { should_confirm, .. }
            | Self::EmptyTrash { should_confirm } => *should_confirm,
            _ => false,
        }
    }
}

/// Constructors provided by an operation engine.
///
/// Each constructor returns the job or the reason none was produced; it never publishes the job.
pub trait JobFactory: Send + Sync {
    /// Build a directory enumeration job.
    fn new_list_job(&self, target: Url, flags: ListFlags) -> JobResult<BoxedJob> {
        let _ = (target, flags);
        Err(unsupported(OperationKind::List))
    }

    /// Build a metadata query job.
    fn new_stat_job(&self, target: Url) -> JobResult<BoxedJob> {
        let _ = target;
        Err(unsupported(OperationKind::Stat))
    }

    /// Build a permanent deletion job.
    fn new_delete_job(
        &self,
        targets: Vec<Url>,
        should_confirm: bool,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        let _ = (targets, should_confirm, delegate);
        Err(unsupported(OperationKind::Delete))
    }

    /// Build a trash job.
    fn new_trash_job(
        &self,
        targets: Vec<Url>,
        should_confirm: bool,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        let _ = (targets, should_confirm, delegate);
        Err(unsupported(OperationKind::Trash))
    }

    /// Build a job emptying the trash.
    fn new_empty_trash_job(
        &self,
        should_confirm: bool,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        let _ = (should_confirm, delegate);
        Err(unsupported(OperationKind::EmptyTrash))
    }

    /// Build a permission change job.
    fn new_chmod_job(&self, target: Url, permission: u32) -> JobResult<BoxedJob> {
        let _ = (target, permission);
        Err(unsupported(OperationKind::Chmod))
    }

    /// Build an ownership change job.
    fn new_chown_job(&self, target: Url, owner: String, group: String) -> JobResult<BoxedJob> {
        let _ = (target, owner, group);
        Err(unsupported(OperationKind::Chown))
    }

    /// Build a file creation job.
    fn new_create_file_job(
        &self,
        dest_dir: Url,
        file_name: String,
        content: Vec<u8>,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        let _ = (dest_dir, file_name, content, delegate);
        Err(unsupported(OperationKind::CreateFile))
    }

    /// Build a directory creation job.
    fn new_create_directory_job(
        &self,
        dest_dir: Url,
        dir_name: String,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        let _ = (dest_dir, dir_name, delegate);
        Err(unsupported(OperationKind::CreateDirectory))
    }

    /// Build a template instantiation job.
    fn new_create_file_from_template_job(
        &self,
        dest_dir: Url,
        template: Url,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        let _ = (dest_dir, template, delegate);
        Err(unsupported(OperationKind::CreateFileFromTemplate))
    }

    /// Build a symbolic link job.
    fn new_link_job(
        &self,
        source: Url,
        dest_dir: Url,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        let _ = (source, dest_dir, delegate);
        Err(unsupported(OperationKind::Link))
    }

    /// Build a rename job.
    fn new_rename_job(&self, target: Url, new_name: String) -> JobResult<BoxedJob> {
        let _ = (target, new_name);
        Err(unsupported(OperationKind::Rename))
    }

    /// Build a default application lookup job.
    fn new_get_default_launch_app_job(
        &self,
        target: Url,
        must_support_uri: bool,
    ) -> JobResult<BoxedJob> {
        let _ = (target, must_support_uri);
        Err(unsupported(OperationKind::GetDefaultLaunchApp))
    }

    /// Build a recommended applications lookup job.
    fn new_get_recommended_launch_apps_job(&self, target: Url) -> JobResult<BoxedJob> {
        let _ = target;
        Err(unsupported(OperationKind::GetRecommendedLaunchApps))
    }

    /// Build an application enumeration job.
    fn new_get_all_launch_apps_job(&self) -> JobResult<BoxedJob> {
        Err(unsupported(OperationKind::GetAllLaunchApps))
    }

    /// Build a job changing the default application of a MIME type.
    fn new_set_default_launch_app_job(
        &self,
        desktop_id: String,
        mime_type: String,
    ) -> JobResult<BoxedJob> {
        let _ = (desktop_id, mime_type);
        Err(unsupported(OperationKind::SetDefaultLaunchApp))
    }

    /// Build a copy job.
    fn new_copy_job(
        &self,
        request: TransferRequest,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        let _ = (request, delegate);
        Err(unsupported(OperationKind::Copy))
    }

    /// Build a move job.
    fn new_move_job(
        &self,
        request: TransferRequest,
        delegate: MaybeDelegate,
    ) -> JobResult<BoxedJob> {
        let _ = (request, delegate);
        Err(unsupported(OperationKind::Move))
    }

    /// Build a template enumeration job.
    fn new_get_template_job(&self, template_dir: Url) -> JobResult<BoxedJob> {
        let _ = template_dir;
        Err(unsupported(OperationKind::GetTemplate))
    }
}

const fn unsupported(operation: OperationKind) -> JobError {
    JobError::Unsupported { operation }
}

/// Route a resolved request to the matching engine constructor.
///
/// The delegate is only forwarded to interactive kinds; it is dropped for the others.
///
/// # Errors
///
/// Propagates the engine's reason for not producing a job.
pub fn build_job(
    engine: &dyn JobFactory,
    descriptor: JobDescriptor,
    delegate: MaybeDelegate,
) -> JobResult<BoxedJob> {
    match descriptor {
        JobDescriptor::List { target, flags } => engine.new_list_job(target, flags),
        JobDescriptor::Stat { target } => engine.new_stat_job(target),
        JobDescriptor::Delete {
            targets,
            should_confirm,
        } => engine.new_delete_job(targets, should_confirm, delegate),
        JobDescriptor::Trash {
            targets,
            should_confirm,
        } => engine.new_trash_job(targets, should_confirm, delegate),
        JobDescriptor::EmptyTrash { should_confirm } => {
            engine.new_empty_trash_job(should_confirm, delegate)
        }
        JobDescriptor::Chmod { target, permission } => engine.new_chmod_job(target, permission),
        JobDescriptor::Chown {
            target,
            owner,
            group,
        } => engine.new_chown_job(target, owner, group),
        JobDescriptor::CreateFile {
            dest_dir,
            file_name,
            content,
        } => engine.new_create_file_job(dest_dir, file_name, content, delegate),
        JobDescriptor::CreateDirectory { dest_dir, dir_name } => {
            engine.new_create_directory_job(dest_dir, dir_name, delegate)
        }
        JobDescriptor::CreateFileFromTemplate { dest_dir, template } => {
            engine.new_create_file_from_template_job(dest_dir, template, delegate)
        }
        JobDescriptor::Link { source, dest_dir } => engine.new_link_job(source, dest_dir, delegate),
        JobDescriptor::Rename { target, new_name } => engine.new_rename_job(target, new_name),
        JobDescriptor::GetDefaultLaunchApp {
            target,
            must_support_uri,
        } => engine.new_get_default_launch_app_job(target, must_support_uri),
        JobDescriptor::GetRecommendedLaunchApps { target } => {
            engine.new_get_recommended_launch_apps_job(target)
        }
        JobDescriptor::GetAllLaunchApps => engine.new_get_all_launch_apps_job(),
        JobDescriptor::SetDefaultLaunchApp {
            desktop_id,
            mime_type,
        } => engine.new_set_default_launch_app_job(desktop_id, mime_type),
        JobDescriptor::Copy(request) => engine.new_copy_job(request, delegate),
        JobDescriptor::Move(request) => engine.new_move_job(request, delegate),
        JobDescriptor::GetTemplate { template_dir } => engine.new_get_template_job(template_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NothingImplemented;

    impl JobFactory for NothingImplemented {}

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid url")
    }

    #[test]
    fn default_constructors_report_the_requested_kind() {
        let descriptors = vec![
            JobDescriptor::Stat {
                target: url("file:///etc/hosts"),
            },
            JobDescriptor::GetAllLaunchApps,
            JobDescriptor::Move(TransferRequest {
                sources: vec![url("file:///tmp/a")],
                dest_dir: None,
                target_name: String::new(),
                flags: TransferFlags::empty(),
            }),
        ];

        for descriptor in descriptors {
            let kind = descriptor.kind();
            match build_job(&NothingImplemented, descriptor, None) {
                Err(JobError::Unsupported { operation }) => assert_eq!(operation, kind),
                Err(other) => panic!("unexpected error: {other:?}"),
                Ok(_) => panic!("no job expected for {kind}"),
            }
        }
    }

    #[test]
    fn confirmation_only_applies_to_destructive_kinds() {
        assert!(JobDescriptor::EmptyTrash { should_confirm: true }.confirmation_requested());
        assert!(
            !JobDescriptor::Trash {
                targets: vec![url("file:///tmp/a")],
                should_confirm: false,
            }
            .confirmation_requested()
        );
        assert!(
            !JobDescriptor::Rename {
                target: url("file:///tmp/a"),
                new_name: "b".to_string(),
            }
            .confirmation_requested()
        );
    }
}
