//! Layered loading of [`DispatchConfig`].
//!
//! # Design
//! - Precedence is defaults, then the TOML file, then `FILEBUS_*` environment variables.
//! - Environment access goes through a lookup closure so tests never mutate the process env.
//! - A missing default-location file is not an error; a missing explicit file is.

use std::env;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::defaults::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_CONFIG_PATH, ENV_CONFIRMATION, ENV_DESTINATION,
    ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_OBJECT_PATH, ENV_TEMPLATE_DIR,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::DispatchConfig;
use crate::validate::{parse_destination, parse_log_level, parse_object_path, parse_template_dir};

/// Load the configuration from the process environment and the default file location.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, or an override is invalid.
pub async fn load() -> ConfigResult<DispatchConfig> {
    load_with(|key| env::var(key).ok()).await
}

/// Load the configuration using `lookup` in place of the process environment.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, or an override is invalid.
pub async fn load_with<F>(lookup: F) -> ConfigResult<DispatchConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(ENV_CONFIG_PATH).filter(|value| !value.trim().is_empty()) {
        Some(explicit) => from_file(Path::new(explicit.trim())).await?,
        None => match default_config_path() {
            Some(path) if fs::try_exists(&path).await.unwrap_or(false) => from_file(&path).await?,
            _ => DispatchConfig::default(),
        },
    };
    apply_env_overrides(&mut config, lookup)?;
    Ok(config)
}

/// Parse a configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] or [`ConfigError::Parse`], or
/// [`ConfigError::InvalidField`] when `template_dir` is not absolute.
pub async fn from_file(path: &Path) -> ConfigResult<DispatchConfig> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let mut config: DispatchConfig =
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if let Some(dir) = config.template_dir.take() {
        config.template_dir = parse_template_dir("template_dir", &dir.to_string_lossy())?;
    }
    debug!(path = %path.display(), "loaded dispatcher configuration file");
    Ok(config)
}

/// `$XDG_CONFIG_HOME/filebus/dispatch.toml`, when a config home is known.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Apply `FILEBUS_*` overrides on top of `config`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for the first override that does not parse.
pub fn apply_env_overrides<F>(config: &mut DispatchConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_DESTINATION) {
        config.bus.destination = parse_destination("bus.destination", &value)?;
    }
    if let Some(value) = lookup(ENV_OBJECT_PATH) {
        config.bus.object_path = parse_object_path("bus.object_path", &value)?;
    }
    if let Some(value) = lookup(ENV_CONFIRMATION) {
        config.confirmation = value.parse()?;
    }
    if let Some(value) = lookup(ENV_TEMPLATE_DIR) {
        config.template_dir = parse_template_dir("template_dir", &value)?;
    }
    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = parse_log_level("logging.level", &value)?;
    }
    if let Some(value) = lookup(ENV_LOG_FORMAT) {
        config.logging.format = Some(value.parse()?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConfirmationPolicy, LogFormatSetting};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut config = DispatchConfig::default();
        apply_env_overrides(
            &mut config,
            lookup_from(&[
                (ENV_DESTINATION, "org.example.Files"),
                (ENV_OBJECT_PATH, "/org/example/Files"),
                (ENV_CONFIRMATION, "proceed_unprompted"),
                (ENV_TEMPLATE_DIR, "/srv/templates"),
                (ENV_LOG_LEVEL, "debug"),
                (ENV_LOG_FORMAT, "json"),
            ]),
        )
        .expect("overrides apply");

        assert_eq!(config.bus.destination.as_str(), "org.example.Files");
        assert_eq!(config.bus.object_path.as_str(), "/org/example/Files");
        assert_eq!(config.confirmation, ConfirmationPolicy::ProceedUnprompted);
        assert_eq!(config.template_dir, Some(PathBuf::from("/srv/templates")));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, Some(LogFormatSetting::Json));
    }

    #[test]
    fn invalid_override_names_the_field() {
        let mut config = DispatchConfig::default();
        let err = apply_env_overrides(&mut config, lookup_from(&[(ENV_OBJECT_PATH, "nope")]))
            .expect_err("relative object path rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "bus.object_path",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn missing_explicit_file_is_a_read_error() {
        let err = load_with(lookup_from(&[(
            ENV_CONFIG_PATH,
            "/nonexistent/filebus/dispatch.toml",
        )]))
        .await
        .expect_err("explicit file must exist");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
