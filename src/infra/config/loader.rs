use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = AppConfig::default();

    if !config_path.exists() {
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path,
        source,
    })?;

    file_config.merge_into(&mut config);
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), AppError> {
    let keyboard = &config.keyboard;

    if keyboard.button_height == 0 {
        return Err(AppError::InvalidConfig {
            field: "keyboard.button_height",
            details: "must be at least 1".into(),
        });
    }

    for (field, value) in [
        ("keyboard.hover_duration_ms", keyboard.hover_duration_ms),
        ("keyboard.ripple_duration_ms", keyboard.ripple_duration_ms),
    ] {
        if value == 0 {
            return Err(AppError::InvalidConfig {
                field,
                details: "must be greater than zero".into(),
            });
        }
    }

    if config.logging.level.trim().is_empty() {
        return Err(AppError::InvalidConfig {
            field: "logging.level",
            details: "must not be empty".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp config must be creatable");
        file.write_all(contents.as_bytes())
            .expect("temp config must be writable");
        file
    }

    #[test]
    fn returns_defaults_when_file_is_missing() {
        let config = load(Some(Path::new("./missing-config.toml"))).expect("config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn merges_file_values_over_defaults() {
        let file = config_file(
            r#"[logging]
level = "debug"
directory = "/tmp/replykb-logs"

[keyboard]
button_skip = 2
ripple_duration_ms = 450

[demo]
callback_latency_ms = 50
"#,
        );

        let config = load(Some(file.path())).expect("config must load");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.directory, Some(PathBuf::from("/tmp/replykb-logs")));
        assert_eq!(config.keyboard.button_skip, 2);
        assert_eq!(config.keyboard.ripple_duration_ms, 450);
        assert_eq!(config.keyboard.button_height, 1);
        assert_eq!(config.demo.callback_latency_ms, 50);
    }

    #[test]
    fn rejects_zero_button_height() {
        let file = config_file("[keyboard]\nbutton_height = 0\n");

        let error = load(Some(file.path())).expect_err("zero height must be rejected");

        assert!(matches!(
            error,
            AppError::InvalidConfig {
                field: "keyboard.button_height",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_animation_duration() {
        let file = config_file("[keyboard]\nhover_duration_ms = 0\n");

        let error = load(Some(file.path())).expect_err("zero duration must be rejected");

        assert!(matches!(
            error,
            AppError::InvalidConfig {
                field: "keyboard.hover_duration_ms",
                ..
            }
        ));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let file = config_file("[keyboard\n");

        let error = load(Some(file.path())).expect_err("broken toml must fail");

        assert!(matches!(error, AppError::ConfigParse { .. }));
        assert!(error.to_string().contains(&file.path().display().to_string()));
    }
}
