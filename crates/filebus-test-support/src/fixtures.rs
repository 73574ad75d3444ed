//! Test fixtures for bus addresses and references.

use filebus_jobs::{DelegateIdentity, JobAddressAllocator};
use zbus::zvariant::{ObjectPath, OwnedObjectPath};

/// Well-known name used by test dispatchers.
pub const TEST_DESTINATION: &str = "org.filebus.Test";
/// Object path used by test dispatchers; also the sentinel path in tests.
pub const TEST_OBJECT_PATH: &str = "/org/filebus/Test";
/// Base path below which test jobs are allocated.
pub const TEST_JOB_BASE: &str = "/org/filebus/Test/jobs";

/// Build an owned object path from a static string known to be valid.
#[must_use]
pub fn object_path(raw: &'static str) -> OwnedObjectPath {
    ObjectPath::from_static_str_unchecked(raw).into()
}

/// Object path of the test dispatcher.
#[must_use]
pub fn dispatcher_path() -> OwnedObjectPath {
    object_path(TEST_OBJECT_PATH)
}

/// Allocator minting job addresses below [`TEST_JOB_BASE`].
#[must_use]
pub fn job_allocator() -> JobAddressAllocator {
    JobAddressAllocator::new(TEST_DESTINATION, object_path(TEST_JOB_BASE))
}

/// Identity of a well-formed caller-side UI handler.
#[must_use]
pub fn ui_identity() -> DelegateIdentity {
    DelegateIdentity::new(
        "org.filebus.TestUi",
        "/org/filebus/TestUi",
        "org.filebus.FileOperationsUi",
    )
}

/// Identity a bus would refuse to bind.
#[must_use]
pub fn broken_identity() -> DelegateIdentity {
    DelegateIdentity::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use filebus_jobs::OperationKind;

    #[test]
    fn allocator_mints_below_the_job_base() {
        let address = job_allocator()
            .allocate(OperationKind::Trash, "org.filebus.TrashJob")
            .expect("valid path");
        assert_eq!(
            address.object_path.as_str(),
            "/org/filebus/Test/jobs/TrashJob/1"
        );
        assert_eq!(dispatcher_path().as_str(), TEST_OBJECT_PATH);
        assert!(broken_identity().destination.is_empty());
        assert!(!ui_identity().destination.is_empty());
    }
}
