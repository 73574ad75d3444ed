//! # Design
//!
//! - Provide structured, constant-message errors for job construction, the bus seam, and UI
//!   delegate calls.
//! - Capture context (operation, field, value) so failures are reproducible from logs alone.
//! - Preserve source errors without interpolating context into error messages.

use thiserror::Error;

use crate::model::OperationKind;

/// Result type for job construction.
pub type JobResult<T> = Result<T, JobError>;

/// Result type for bus substrate operations.
pub type BusResult<T> = Result<T, BusError>;

/// Result type for UI delegate calls.
pub type DelegateResult<T> = Result<T, DelegateError>;

/// Reasons an engine declines to produce a job.
#[derive(Debug, Error)]
pub enum JobError {
    /// The engine does not implement the operation.
    #[error("job operation not supported")]
    Unsupported {
        /// Operation that was requested.
        operation: OperationKind,
    },
    /// The engine rejected one of the parameters.
    #[error("job parameters rejected")]
    Rejected {
        /// Operation that was requested.
        operation: OperationKind,
        /// Parameter that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// A job address could not be composed.
    #[error("job address invalid")]
    InvalidAddress {
        /// Address that failed validation.
        value: String,
        /// Underlying object path error.
        source: zbus::zvariant::Error,
    },
}

/// Failures raised by the bus substrate.
#[derive(Debug, Error)]
pub enum BusError {
    /// Exporting the job object failed in the transport.
    #[error("job export failed")]
    Export {
        /// Object path the job asked for.
        object_path: String,
        /// Underlying transport error.
        source: zbus::Error,
    },
    /// Another object already lives at the job's object path.
    #[error("job object path already in use")]
    AddressInUse {
        /// Object path the job asked for.
        object_path: String,
    },
    /// The UI delegate identity was malformed.
    #[error("ui delegate identity invalid")]
    InvalidDelegate {
        /// Identity component that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
        /// Underlying name or path error.
        source: zbus::Error,
    },
    /// Building the UI delegate proxy failed.
    #[error("ui delegate proxy construction failed")]
    DelegateProxy {
        /// Underlying transport error.
        source: zbus::Error,
    },
}

/// Failures raised while prompting the user through a UI delegate.
#[derive(Debug, Error)]
pub enum DelegateError {
    /// The remote call failed.
    #[error("ui delegate call failed")]
    Call {
        /// Remote method name.
        method: &'static str,
        /// Underlying transport error.
        source: zbus::Error,
    },
    /// The remote handler replied with an unknown response code.
    #[error("ui delegate response invalid")]
    InvalidResponse {
        /// Remote method name.
        method: &'static str,
        /// Response code received.
        code: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn error_messages_stay_constant() {
        let unsupported = JobError::Unsupported {
            operation: OperationKind::Copy,
        };
        assert_eq!(unsupported.to_string(), "job operation not supported");

        let rejected = JobError::Rejected {
            operation: OperationKind::SetDefaultLaunchApp,
            field: "desktop_id",
            reason: "missing_suffix",
            value: Some("firefox".to_string()),
        };
        assert_eq!(rejected.to_string(), "job parameters rejected");

        let in_use = BusError::AddressInUse {
            object_path: "/org/filebus/Jobs/CopyJob/1".to_string(),
        };
        assert_eq!(in_use.to_string(), "job object path already in use");
        assert!(in_use.source().is_none());
    }

    #[test]
    fn transport_errors_keep_their_source() {
        let export = BusError::Export {
            object_path: "/org/filebus/Jobs/ListJob/1".to_string(),
            source: zbus::Error::Failure("transport not ready".to_string()),
        };
        assert!(export.source().is_some());

        let call = DelegateError::Call {
            method: "ConflictDialog",
            source: zbus::Error::Failure("peer vanished".to_string()),
        };
        assert!(call.source().is_some());
        assert_eq!(call.to_string(), "ui delegate call failed");
    }
}
