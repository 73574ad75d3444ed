//! Typed configuration models.
//!
//! # Design
//! - Every field has a default so an absent file is a valid configuration.
//! - Bus identities are stored as validated `zbus` name and path types.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use zbus::names::{OwnedWellKnownName, WellKnownName};
use zbus::zvariant::{ObjectPath, OwnedObjectPath};

use crate::defaults::{DEFAULT_DESTINATION, DEFAULT_LOG_LEVEL, DEFAULT_OBJECT_PATH};
use crate::error::ConfigError;

/// Complete dispatcher configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Where the dispatcher lives on the session bus.
    pub bus: BusConfig,
    /// Handling of confirmation requests that cannot reach a UI handler.
    pub confirmation: ConfirmationPolicy,
    /// Templates directory override; the XDG user directory is used when unset.
    pub template_dir: Option<PathBuf>,
    /// Logging preferences.
    pub logging: LoggingSettings,
}

/// Bus identity of the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    /// Well-known name claimed on the session bus.
    pub destination: OwnedWellKnownName,
    /// Object path of the dispatcher; also the placeholder path of the sentinel address.
    pub object_path: OwnedObjectPath,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            destination: WellKnownName::from_static_str_unchecked(DEFAULT_DESTINATION).into(),
            object_path: ObjectPath::from_static_str_unchecked(DEFAULT_OBJECT_PATH).into(),
        }
    }
}

/// What to do when a request asks for confirmation but no UI delegate could be bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationPolicy {
    /// Reject the request; the caller receives the sentinel address.
    #[default]
    FailClosed,
    /// Hand the job to the engine without a delegate.
    ProceedUnprompted,
}

impl ConfirmationPolicy {
    /// Configuration spelling of the policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FailClosed => "fail_closed",
            Self::ProceedUnprompted => "proceed_unprompted",
        }
    }
}

impl FromStr for ConfirmationPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail_closed" => Ok(Self::FailClosed),
            "proceed_unprompted" => Ok(Self::ProceedUnprompted),
            _ => Err(ConfigError::InvalidField {
                field: "confirmation",
                reason: "unknown_policy",
                value: Some(value.to_string()),
            }),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormatSetting {
    /// Human-readable output.
    Pretty,
    /// Structured JSON output.
    Json,
}

impl FromStr for LogFormatSetting {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidField {
                field: "logging.format",
                reason: "unknown_format",
                value: Some(value.to_string()),
            }),
        }
    }
}

/// Logging preferences.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Output format; inferred from the build profile when unset.
    pub format: Option<LogFormatSetting>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_well_known_identity() {
        let config = DispatchConfig::default();
        assert_eq!(config.bus.destination.as_str(), DEFAULT_DESTINATION);
        assert_eq!(config.bus.object_path.as_str(), DEFAULT_OBJECT_PATH);
        assert_eq!(config.confirmation, ConfirmationPolicy::FailClosed);
        assert_eq!(config.logging.level, "info");
        assert!(config.template_dir.is_none());
    }

    #[test]
    fn policies_parse_case_insensitively() {
        assert_eq!(
            "Proceed_Unprompted".parse::<ConfirmationPolicy>().ok(),
            Some(ConfirmationPolicy::ProceedUnprompted)
        );
        assert!(matches!(
            "sometimes".parse::<ConfirmationPolicy>(),
            Err(ConfigError::InvalidField {
                field: "confirmation",
                ..
            })
        ));
        assert_eq!(
            " JSON ".parse::<LogFormatSetting>().ok(),
            Some(LogFormatSetting::Json)
        );
        assert!("xml".parse::<LogFormatSetting>().is_err());
    }
}
