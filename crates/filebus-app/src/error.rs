//! # Design
//!
//! - Centralize fatal startup and lifecycle errors.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::io;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: filebus_config::ConfigError,
    },
    /// Telemetry could not be installed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: filebus_telemetry::TelemetryError,
    },
    /// The session bus was unreachable.
    #[error("session bus connection failed")]
    BusConnect {
        /// Source bus error.
        source: zbus::Error,
    },
    /// The dispatcher object could not be registered.
    #[error("dispatcher registration failed")]
    Serve {
        /// Object path the dispatcher was meant to occupy.
        object_path: String,
        /// Source bus error.
        source: zbus::Error,
    },
    /// Another object already occupies the dispatcher path.
    #[error("dispatcher object path already in use")]
    AddressInUse {
        /// Contested object path.
        object_path: String,
    },
    /// The well-known name could not be claimed or released.
    #[error("bus name request failed")]
    NameRequest {
        /// Operation identifier.
        operation: &'static str,
        /// Well-known name involved.
        name: String,
        /// Source bus error.
        source: zbus::Error,
    },
    /// IO operations failed.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Source IO error.
        source: io::Error,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: filebus_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: filebus_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn io(operation: &'static str, source: io::Error) -> Self {
        Self::Io { operation, source }
    }

    pub(crate) fn name_request(
        operation: &'static str,
        name: impl Into<String>,
        source: zbus::Error,
    ) -> Self {
        Self::NameRequest {
            operation,
            name: name.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.load",
            filebus_config::ConfigError::InvalidField {
                field: "confirmation",
                reason: "unknown_policy",
                value: Some("maybe".to_string()),
            },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert!(config.source().is_some());

        let io = AppError::io("signal.terminate", io::Error::other("no signals"));
        assert!(matches!(
            io,
            AppError::Io {
                operation: "signal.terminate",
                ..
            }
        ));

        let name = AppError::name_request(
            "bus.request_name",
            "org.filebus.Operations",
            zbus::Error::NameTaken,
        );
        assert_eq!(name.to_string(), "bus name request failed");
        assert!(matches!(
            name,
            AppError::NameRequest { ref name, .. } if name == "org.filebus.Operations"
        ));
    }

    #[test]
    fn address_in_use_carries_no_source() {
        let err = AppError::AddressInUse {
            object_path: "/org/filebus/Operations".to_string(),
        };
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "dispatcher object path already in use");
    }
}
