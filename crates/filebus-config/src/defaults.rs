//! Default bus identity and environment variable names.
//!
//! # Design
//! - Keep every default in one place so the dispatcher, CLI, and tests agree.

/// Well-known bus name claimed by the dispatcher.
pub const DEFAULT_DESTINATION: &str = "org.filebus.Operations";
/// Object path the dispatcher is served at; doubles as the sentinel job path.
pub const DEFAULT_OBJECT_PATH: &str = "/org/filebus/Operations";
/// Log level used when neither the file nor the environment sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Explicit configuration file location.
pub const ENV_CONFIG_PATH: &str = "FILEBUS_CONFIG";
/// Overrides `bus.destination`.
pub const ENV_DESTINATION: &str = "FILEBUS_DESTINATION";
/// Overrides `bus.object_path`.
pub const ENV_OBJECT_PATH: &str = "FILEBUS_OBJECT_PATH";
/// Overrides `confirmation`.
pub const ENV_CONFIRMATION: &str = "FILEBUS_CONFIRMATION";
/// Overrides `template_dir`.
pub const ENV_TEMPLATE_DIR: &str = "FILEBUS_TEMPLATE_DIR";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "FILEBUS_LOG_LEVEL";
/// Overrides `logging.format`.
pub const ENV_LOG_FORMAT: &str = "FILEBUS_LOG_FORMAT";

/// Directory below the XDG config home holding the configuration file.
pub(crate) const CONFIG_DIR_NAME: &str = "filebus";
/// File name of the configuration file.
pub(crate) const CONFIG_FILE_NAME: &str = "dispatch.toml";
