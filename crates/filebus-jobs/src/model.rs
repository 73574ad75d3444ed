//! Addressing and parameter types shared by the dispatcher and operation engines.
//!
//! # Design
//! - A job is identified by its public bus address only; nothing here tracks job state.
//! - The sentinel address keeps the object path well-formed and signals failure through an
//!   empty interface.
//! - Wire integers are converted into typed flags without dropping unknown bits.

use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use serde::Serialize;
use zbus::zvariant::{ObjectPath, OwnedObjectPath};

use crate::error::{JobError, JobResult};

/// Operation kinds understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Enumerate the children of a directory.
    List,
    /// Query file metadata.
    Stat,
    /// Delete files permanently.
    Delete,
    /// Move files to the trash.
    Trash,
    /// Remove everything from the trash.
    EmptyTrash,
    /// Change file permissions.
    Chmod,
    /// Change file ownership.
    Chown,
    /// Create a regular file with initial content.
    CreateFile,
    /// Create a directory.
    CreateDirectory,
    /// Create a file by instantiating a template.
    CreateFileFromTemplate,
    /// Create a symbolic link.
    Link,
    /// Rename a file in place.
    Rename,
    /// Resolve the default application for a file.
    GetDefaultLaunchApp,
    /// Resolve the recommended applications for a file.
    GetRecommendedLaunchApps,
    /// Enumerate every installed application.
    GetAllLaunchApps,
    /// Set the default application for a MIME type.
    SetDefaultLaunchApp,
    /// Copy files into a directory.
    Copy,
    /// Move files into a directory.
    Move,
    /// Enumerate the user's document templates.
    GetTemplate,
}

impl OperationKind {
    /// Every operation kind, in wire declaration order.
    pub const ALL: [Self; 19] = [
        Self::List,
        Self::Stat,
        Self::Delete,
        Self::Trash,
        Self::EmptyTrash,
        Self::Chmod,
        Self::Chown,
        Self::CreateFile,
        Self::CreateDirectory,
        Self::CreateFileFromTemplate,
        Self::Link,
        Self::Rename,
        Self::GetDefaultLaunchApp,
        Self::GetRecommendedLaunchApps,
        Self::GetAllLaunchApps,
        Self::SetDefaultLaunchApp,
        Self::Copy,
        Self::Move,
        Self::GetTemplate,
    ];

    /// Machine-friendly label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Stat => "stat",
            Self::Delete => "delete",
            Self::Trash => "trash",
            Self::EmptyTrash => "empty_trash",
            Self::Chmod => "chmod",
            Self::Chown => "chown",
            Self::CreateFile => "create_file",
            Self::CreateDirectory => "create_directory",
            Self::CreateFileFromTemplate => "create_file_from_template",
            Self::Link => "link",
            Self::Rename => "rename",
            Self::GetDefaultLaunchApp => "get_default_launch_app",
            Self::GetRecommendedLaunchApps => "get_recommended_launch_apps",
            Self::GetAllLaunchApps => "get_all_launch_apps",
            Self::SetDefaultLaunchApp => "set_default_launch_app",
            Self::Copy => "copy",
            Self::Move => "move",
            Self::GetTemplate => "get_template",
        }
    }

    /// Object path segment naming jobs of this kind (e.g. `CopyJob`).
    #[must_use]
    pub const fn job_name(self) -> &'static str {
        match self {
            Self::List => "ListJob",
            Self::Stat => "StatJob",
            Self::Delete => "DeleteJob",
            Self::Trash => "TrashJob",
            Self::EmptyTrash => "EmptyTrashJob",
            Self::Chmod => "ChmodJob",
            Self::Chown => "ChownJob",
            Self::CreateFile => "CreateFileJob",
            Self::CreateDirectory => "CreateDirectoryJob",
            Self::CreateFileFromTemplate => "CreateFileFromTemplateJob",
            Self::Link => "LinkJob",
            Self::Rename => "RenameJob",
            Self::GetDefaultLaunchApp => "GetDefaultLaunchAppJob",
            Self::GetRecommendedLaunchApps => "GetRecommendedLaunchAppsJob",
            Self::GetAllLaunchApps => "GetAllLaunchAppsJob",
            Self::SetDefaultLaunchApp => "SetDefaultLaunchAppJob",
            Self::Copy => "CopyJob",
            Self::Move => "MoveJob",
            Self::GetTemplate => "GetTemplateJob",
        }
    }

    /// Whether requests of this kind carry a UI delegate identity.
    #[must_use]
    pub const fn accepts_delegate(self) -> bool {
        matches!(
            self,
            Self::Delete
                | Self::Trash
                | Self::EmptyTrash
                | Self::CreateFile
                | Self::CreateDirectory
                | Self::CreateFileFromTemplate
                | Self::Link
                | Self::Copy
                | Self::Move
        )
    }
}

impl Display for OperationKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Public bus address of an installed job.
///
/// An empty `interface` is the one authoritative "nothing was installed" signal; the object
/// path is never empty because empty paths are invalid on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobAddress {
    /// Bus name owning the job object.
    pub destination: String,
    /// Object path the job is exported at.
    pub object_path: OwnedObjectPath,
    /// Interface exposing the job's own methods.
    pub interface: String,
}

impl JobAddress {
    /// Sentinel address reported when no job could be installed.
    #[must_use]
    pub fn sentinel(object_path: &OwnedObjectPath) -> Self {
        Self {
            destination: String::new(),
            object_path: object_path.clone(),
            interface: String::new(),
        }
    }

    /// Whether this address points at a live job.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        !self.interface.is_empty()
    }

    /// Flatten into the `(s, o, s)` reply shape used on the wire.
    #[must_use]
    pub fn into_wire(self) -> (String, OwnedObjectPath, String) {
        (self.destination, self.object_path, self.interface)
    }

    /// Rebuild an address from the `(s, o, s)` reply shape.
    #[must_use]
    pub fn from_wire(
        (destination, object_path, interface): (String, OwnedObjectPath, String),
    ) -> Self {
        Self {
            destination,
            object_path,
            interface,
        }
    }
}

/// Mints unique job addresses below a base object path.
///
/// Paths have the form `<base>/<Kind>Job/<n>`; the counter is shared by all kinds so a single
/// allocator never hands out the same path twice.
#[derive(Debug)]
pub struct JobAddressAllocator {
    destination: String,
    base_path: OwnedObjectPath,
    next_id: AtomicU64,
}

impl JobAddressAllocator {
    /// Create an allocator for jobs owned by `destination` below `base_path`.
    #[must_use]
    pub fn new(destination: impl Into<String>, base_path: OwnedObjectPath) -> Self {
        Self {
            destination: destination.into(),
            base_path,
            next_id: AtomicU64::new(1),
        }
    }

    /// Reserve the next address for a job of `kind` exposing `interface`.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::InvalidAddress`] if the composed object path is rejected by the bus
    /// grammar.
    pub fn allocate(
        &self,
        kind: OperationKind,
        interface: impl Into<String>,
    ) -> JobResult<JobAddress> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let base = self.base_path.as_str().trim_end_matches('/');
        let raw = format!("{base}/{}/{id}", kind.job_name());
        let object_path = ObjectPath::try_from(raw.clone())
            .map(OwnedObjectPath::from)
            .map_err(|source| JobError::InvalidAddress { value: raw, source })?;
        Ok(JobAddress {
            destination: self.destination.clone(),
            object_path,
            interface: interface.into(),
        })
    }
}

/// Remote identity of a caller-side UI handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegateIdentity {
    /// Bus name of the UI handler.
    pub destination: String,
    /// Object path of the UI handler.
    pub object_path: String,
    /// Interface implementing the prompt methods.
    pub interface: String,
}

impl DelegateIdentity {
    /// Build an identity from the raw wire triple.
    #[must_use]
    pub fn new(
        destination: impl Into<String>,
        object_path: impl Into<String>,
        interface: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            object_path: object_path.into(),
            interface: interface.into(),
        }
    }
}

impl Display for DelegateIdentity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "({}, {}, {})",
            self.destination, self.object_path, self.interface
        )
    }
}

bitflags! {
    /// Options controlling directory enumeration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ListFlags: i32 {
        /// Include dot-files.
        const INCLUDE_HIDDEN = 1 << 0;
        /// Descend into subdirectories.
        const RECURSIVE = 1 << 1;
    }
}

impl ListFlags {
    /// Convert the wire integer, keeping bits this crate does not name.
    #[must_use]
    pub const fn from_wire(bits: i32) -> Self {
        Self::from_bits_retain(bits)
    }
}

bitflags! {
    /// Options controlling copy and move transfers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TransferFlags: u32 {
        /// Replace existing targets.
        const OVERWRITE = 1 << 0;
        /// Keep a backup of replaced targets.
        const BACKUP = 1 << 1;
        /// Copy symbolic links instead of their targets.
        const NOFOLLOW_SYMLINKS = 1 << 2;
        /// Preserve every metadata attribute.
        const ALL_METADATA = 1 << 3;
        /// Fail a move rather than falling back to copy-and-delete.
        const NO_FALLBACK_FOR_MOVE = 1 << 4;
        /// Apply default permissions to the target.
        const TARGET_DEFAULT_PERMS = 1 << 5;
    }
}

impl TransferFlags {
    /// Convert the wire integer, keeping bits this crate does not name.
    #[must_use]
    pub const fn from_wire(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }
}
