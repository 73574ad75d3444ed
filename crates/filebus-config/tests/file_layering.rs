use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use filebus_config::defaults::{ENV_CONFIG_PATH, ENV_CONFIRMATION};
use filebus_config::{ConfigError, ConfirmationPolicy, LogFormatSetting, load_with};

fn lookup(pairs: Vec<(&'static str, String)>) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<&'static str, String> = pairs.into_iter().collect();
    move |key| map.get(key).cloned()
}

#[tokio::test]
async fn file_values_apply_and_env_wins() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dispatch.toml");
    fs::write(
        &path,
        r#"
confirmation = "proceed_unprompted"
template_dir = "/srv/templates"

[bus]
destination = "org.example.Files"
object_path = "/org/example/Files"

[logging]
level = "debug"
format = "pretty"
"#,
    )?;

    let from_file = load_with(lookup(vec![(
        ENV_CONFIG_PATH,
        path.display().to_string(),
    )]))
    .await?;
    assert_eq!(from_file.bus.destination.as_str(), "org.example.Files");
    assert_eq!(from_file.bus.object_path.as_str(), "/org/example/Files");
    assert_eq!(from_file.confirmation, ConfirmationPolicy::ProceedUnprompted);
    assert_eq!(from_file.template_dir, Some(PathBuf::from("/srv/templates")));
    assert_eq!(from_file.logging.level, "debug");
    assert_eq!(from_file.logging.format, Some(LogFormatSetting::Pretty));

    let overridden = load_with(lookup(vec![
        (ENV_CONFIG_PATH, path.display().to_string()),
        (ENV_CONFIRMATION, "fail_closed".to_string()),
    ]))
    .await?;
    assert_eq!(overridden.confirmation, ConfirmationPolicy::FailClosed);
    assert_eq!(overridden.bus.destination.as_str(), "org.example.Files");
    Ok(())
}

#[tokio::test]
async fn partial_file_keeps_remaining_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dispatch.toml");
    fs::write(&path, "[logging]\nlevel = \"trace\"\n")?;

    let config = load_with(lookup(vec![(ENV_CONFIG_PATH, path.display().to_string())])).await?;
    assert_eq!(config.logging.level, "trace");
    assert_eq!(config.bus.object_path.as_str(), "/org/filebus/Operations");
    assert_eq!(config.confirmation, ConfirmationPolicy::FailClosed);
    Ok(())
}

#[tokio::test]
async fn unknown_keys_and_bad_values_fail_to_parse() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dispatch.toml");

    fs::write(&path, "colour = \"blue\"\n")?;
    let err = load_with(lookup(vec![(ENV_CONFIG_PATH, path.display().to_string())]))
        .await
        .err()
        .ok_or("unknown key accepted")?;
    assert!(matches!(err, ConfigError::Parse { .. }));

    fs::write(&path, "[bus]\nobject_path = \"not/a/path\"\n")?;
    let err = load_with(lookup(vec![(ENV_CONFIG_PATH, path.display().to_string())]))
        .await
        .err()
        .ok_or("invalid object path accepted")?;
    assert!(matches!(err, ConfigError::Parse { .. }));
    Ok(())
}

#[tokio::test]
async fn relative_template_dir_in_file_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dispatch.toml");
    fs::write(&path, "template_dir = \"Templates\"\n")?;

    let err = load_with(lookup(vec![(ENV_CONFIG_PATH, path.display().to_string())]))
        .await
        .err()
        .ok_or("relative template_dir accepted")?;
    assert!(matches!(
        err,
        ConfigError::InvalidField {
            field: "template_dir",
            reason: "path_not_absolute",
            ..
        }
    ));
    Ok(())
}
