//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read configuration file")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The configuration file was not valid TOML for the expected schema.
    #[error("failed to parse configuration file")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Source TOML error.
        source: toml::de::Error,
    },
    /// A field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn config_error_messages_are_constant() {
        let read = ConfigError::Read {
            path: PathBuf::from("/nonexistent/dispatch.toml"),
            source: io::Error::other("io"),
        };
        assert_eq!(read.to_string(), "failed to read configuration file");
        assert!(read.source().is_some());

        let invalid = ConfigError::InvalidField {
            field: "confirmation",
            reason: "unknown_policy",
            value: Some("maybe".to_string()),
        };
        assert_eq!(invalid.to_string(), "invalid configuration field");
        assert!(invalid.source().is_none());
    }
}
