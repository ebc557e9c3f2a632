// TOML config adapter - Configuration hierarchy backed by TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::exec_ffmpeg::DEFAULT_DIAGNOSTIC_LINES;
use crate::adapters::tracing_log::LogLevel;
use crate::domain::model::DOWNLOAD_NAME;
use crate::error::{EditxError, EditxResult};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "editx.toml";

/// Engine discovery and diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Explicit ffmpeg binary; `PATH` lookup when unset
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit ffprobe binary; `PATH` lookup when unset
    pub ffprobe_path: Option<PathBuf>,
    /// Engine lines kept for execution errors
    pub diagnostic_lines: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            diagnostic_lines: DEFAULT_DIAGNOSTIC_LINES,
        }
    }
}

/// Logging output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Where the edited clip is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub file_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            file_name: DOWNLOAD_NAME.to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditxConfig {
    pub engine: EngineSettings,
    pub logging: LoggingSettings,
    pub output: OutputSettings,
}

/// Command-line values that take precedence over every other source
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_json: bool,
}

/// Loads configuration following precedence: CLI > Env > File > Defaults
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a TOML document; `origin` names it in errors
    pub fn parse(content: &str, origin: &str) -> EditxResult<EditxConfig> {
        toml::from_str(content).map_err(|source| EditxError::ConfigParseError {
            path: origin.to_string(),
            source,
        })
    }

    /// Load a configuration file
    pub fn load_file(path: &Path) -> EditxResult<EditxConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Serialize configuration to TOML
    pub fn to_toml(config: &EditxConfig) -> EditxResult<String> {
        toml::to_string_pretty(config).map_err(|e| EditxError::ConfigError {
            message: format!("Failed to serialize configuration: {}", e),
        })
    }

    /// Build the effective configuration
    ///
    /// An explicit `file` must exist; otherwise `editx.toml` in the working
    /// directory is used when present.
    pub fn load_hierarchy(
        file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> EditxResult<EditxConfig> {
        let mut config = match file {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Self::load_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                Self::load_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No configuration file found, using defaults");
                EditxConfig::default()
            }
        };

        Self::apply_env(&mut config, |key| std::env::var(key).ok());
        Self::apply_overrides(&mut config, overrides);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Apply `EDITX_*` environment variables through `lookup`
    pub fn apply_env<F>(config: &mut EditxConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        if let Some(value) = lookup("EDITX_FFMPEG_PATH") {
            config.engine.ffmpeg_path = Some(PathBuf::from(value));
            applied += 1;
        }
        if let Some(value) = lookup("EDITX_FFPROBE_PATH") {
            config.engine.ffprobe_path = Some(PathBuf::from(value));
            applied += 1;
        }
        if let Some(value) = lookup("EDITX_LOG_LEVEL") {
            config.logging.level = value;
            applied += 1;
        }
        if let Some(value) = lookup("EDITX_LOG_JSON") {
            config.logging.json = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes");
            applied += 1;
        }
        if let Some(value) = lookup("EDITX_OUTPUT_FILE") {
            config.output.file_name = value;
            applied += 1;
        }
        if applied > 0 {
            debug!("Applied {} environment variable overrides", applied);
        }
    }

    /// Apply command-line overrides
    pub fn apply_overrides(config: &mut EditxConfig, overrides: &ConfigOverrides) {
        if let Some(path) = &overrides.ffmpeg_path {
            config.engine.ffmpeg_path = Some(path.clone());
        }
        if let Some(path) = &overrides.ffprobe_path {
            config.engine.ffprobe_path = Some(path.clone());
        }
        if let Some(level) = &overrides.log_level {
            config.logging.level = level.clone();
        }
        if overrides.log_json {
            config.logging.json = true;
        }
    }

    /// Validate configuration
    pub fn validate(config: &EditxConfig) -> EditxResult<()> {
        LogLevel::parse(&config.logging.level).map_err(|e| EditxError::ConfigError {
            message: e.to_string(),
        })?;

        if config.engine.diagnostic_lines == 0 {
            return Err(EditxError::ConfigError {
                message: "engine.diagnostic_lines must be at least 1".to_string(),
            });
        }

        if config.output.file_name.trim().is_empty() {
            return Err(EditxError::ConfigError {
                message: "output.file_name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EditxConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(config.output.file_name, "edited_video.mp4");
        assert_eq!(config.engine.diagnostic_lines, DEFAULT_DIAGNOSTIC_LINES);
        assert!(TomlConfigAdapter::validate(&config).is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TomlConfigAdapter::parse(
            r#"
            [engine]
            ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"

            [logging]
            json = true
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(
            config.engine.ffmpeg_path,
            Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"))
        );
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output.file_name, "edited_video.mp4");
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = TomlConfigAdapter::parse("[engine\nffmpeg_path = 1", "broken.toml");
        assert!(matches!(
            result,
            Err(EditxError::ConfigParseError { ref path, .. }) if path == "broken.toml"
        ));
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let mut config = TomlConfigAdapter::parse(
            "[logging]\nlevel = \"warn\"\n[output]\nfile_name = \"from_file.mp4\"",
            "inline",
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            ("EDITX_LOG_LEVEL", "debug"),
            ("EDITX_OUTPUT_FILE", "from_env.mp4"),
        ]
        .into_iter()
        .collect();
        TomlConfigAdapter::apply_env(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.output.file_name, "from_env.mp4");

        let overrides = ConfigOverrides {
            log_level: Some("trace".to_string()),
            ..ConfigOverrides::default()
        };
        TomlConfigAdapter::apply_overrides(&mut config, &overrides);

        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.output.file_name, "from_env.mp4");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = EditxConfig::default();
        config.logging.level = "loud".to_string();
        assert!(TomlConfigAdapter::validate(&config).is_err());

        let mut config = EditxConfig::default();
        config.engine.diagnostic_lines = 0;
        assert!(TomlConfigAdapter::validate(&config).is_err());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editx.toml");
        let mut config = EditxConfig::default();
        config.engine.diagnostic_lines = 50;

        std::fs::write(&path, TomlConfigAdapter::to_toml(&config).unwrap()).unwrap();

        assert_eq!(TomlConfigAdapter::load_file(&path).unwrap(), config);
    }
}
