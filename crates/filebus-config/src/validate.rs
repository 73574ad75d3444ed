//! Parsing helpers for environment overrides.

use std::path::PathBuf;

use zbus::names::OwnedWellKnownName;
use zbus::zvariant::OwnedObjectPath;

use crate::error::{ConfigError, ConfigResult};

/// Parse a well-known bus name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not a valid well-known name.
pub fn parse_destination(field: &'static str, value: &str) -> ConfigResult<OwnedWellKnownName> {
    OwnedWellKnownName::try_from(value.trim().to_string()).map_err(|_| ConfigError::InvalidField {
        field,
        reason: "invalid_bus_name",
        value: Some(value.to_string()),
    })
}

/// Parse an object path.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not a valid object path.
pub fn parse_object_path(field: &'static str, value: &str) -> ConfigResult<OwnedObjectPath> {
    OwnedObjectPath::try_from(value.trim().to_string()).map_err(|_| ConfigError::InvalidField {
        field,
        reason: "invalid_object_path",
        value: Some(value.to_string()),
    })
}

/// Parse a directory override; blank values clear the override.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the path is relative.
pub fn parse_template_dir(field: &'static str, value: &str) -> ConfigResult<Option<PathBuf>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let path = PathBuf::from(trimmed);
    if !path.is_absolute() {
        return Err(ConfigError::InvalidField {
            field,
            reason: "path_not_absolute",
            value: Some(value.to_string()),
        });
    }
    Ok(Some(path))
}

/// Reject blank log levels.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is empty.
pub fn parse_log_level(field: &'static str, value: &str) -> ConfigResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidField {
            field,
            reason: "empty",
            value: None,
        });
    }
    Ok(trimmed.to_string())
}
