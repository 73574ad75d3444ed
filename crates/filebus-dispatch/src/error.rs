//! # Design
//!
//! - One error channel for the whole pipeline; the sentinel address is produced only at the
//!   wire boundary.
//! - Constant messages; the failing operation and argument travel as fields.

use filebus_jobs::{BusError, JobError, OperationKind};
use thiserror::Error;

/// Result alias for normalization.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Result alias for dispatch.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Reasons a raw path cannot become a canonical reference.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The path component is not absolute.
    #[error("path is not absolute")]
    NotAbsolute {
        /// Raw input.
        value: String,
    },
    /// The input is not a parseable reference.
    #[error("path could not be parsed")]
    Parse {
        /// Raw input.
        value: String,
        /// Underlying URL parse error.
        source: url::ParseError,
    },
}

/// Reasons a request did not produce an installed job.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A path argument failed normalization.
    #[error("request path rejected")]
    Normalize {
        /// Operation being dispatched.
        operation: OperationKind,
        /// Argument that failed.
        field: &'static str,
        /// Normalization failure.
        source: NormalizeError,
    },
    /// A non-path argument failed validation.
    #[error("request argument rejected")]
    InvalidArgument {
        /// Operation being dispatched.
        operation: OperationKind,
        /// Argument that failed.
        field: &'static str,
        /// Machine-readable reason.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// Confirmation was requested but no UI delegate could be bound.
    #[error("confirmation requested without a ui delegate")]
    ConfirmationUnavailable {
        /// Operation being dispatched.
        operation: OperationKind,
    },
    /// The user's templates directory could not be resolved.
    #[error("templates directory unavailable")]
    TemplatesUnavailable {
        /// Operation being dispatched.
        operation: OperationKind,
    },
    /// The engine produced no job.
    #[error("engine produced no job")]
    NilJob {
        /// Operation being dispatched.
        operation: OperationKind,
        /// Engine refusal.
        source: JobError,
    },
    /// The job could not be published on the bus.
    #[error("job installation failed")]
    Install {
        /// Operation being dispatched.
        operation: OperationKind,
        /// Bus failure.
        source: BusError,
    },
}

impl DispatchError {
    /// Operation the failed request was for.
    #[must_use]
    pub const fn operation(&self) -> OperationKind {
        match self {
            Self::Normalize { operation, .. }
            | Self::InvalidArgument { operation, .. }
            | Self::ConfirmationUnavailable { operation }
            | Self::TemplatesUnavailable { operation }
            | Self::NilJob { operation, .. }
            | Self::Install { operation, .. } => *operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_are_constant_and_sources_kept() {
        let normalize = DispatchError::Normalize {
            operation: OperationKind::Rename,
            field: "path",
            source: NormalizeError::NotAbsolute {
                value: "relative/path".to_string(),
            },
        };
        assert_eq!(normalize.to_string(), "request path rejected");
        assert_eq!(normalize.operation(), OperationKind::Rename);
        assert!(normalize.source().is_some());

        let nil = DispatchError::NilJob {
            operation: OperationKind::Copy,
            source: JobError::Unsupported {
                operation: OperationKind::Copy,
            },
        };
        assert_eq!(nil.to_string(), "engine produced no job");
        assert!(nil.source().is_some());

        let confirm = DispatchError::ConfirmationUnavailable {
            operation: OperationKind::EmptyTrash,
        };
        assert!(confirm.source().is_none());
    }
}
