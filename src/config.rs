//! Runtime configuration
//!
//! Provides centralized configuration management with:
//! - Config file loading (optional)
//! - Environment variable overrides
//! - Runtime defaults and validation

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Report output configuration
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default report directory when the CLI gives none.
    pub directory: PathBuf,
    /// Overwrite existing report files without requiring --force.
    pub overwrite: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "error".to_string(),
                format: "pretty".to_string(),
                output: "console".to_string(),
                directory: PathBuf::from("logs"),
            },
            output: OutputConfig {
                directory: PathBuf::from("."),
                overwrite: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and defaults.
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let config_paths = [
            PathBuf::from("rlm-usage.toml"),
            PathBuf::from(".rlm-usage.toml"),
            dirs::config_dir()
                .map(|dir| dir.join("rlm-usage").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Environment variables win over file values. All are optional.
    fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("RLM_USAGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("RLM_USAGE_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(output) = env::var("RLM_USAGE_LOG_OUTPUT") {
            self.logging.output = output;
        }
        if let Ok(dir) = env::var("RLM_USAGE_LOG_DIR") {
            self.logging.directory = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("RLM_USAGE_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(dir);
        }
        if let Ok(overwrite) = env::var("RLM_USAGE_OVERWRITE") {
            self.output.overwrite = matches!(overwrite.as_str(), "1" | "true" | "yes");
        }
    }

    fn validate(&self) -> Result<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level '{}', expected one of {:?}",
                self.logging.level,
                LEVELS
            );
        }
        if !["pretty", "json"].contains(&self.logging.format.as_str()) {
            anyhow::bail!(
                "Invalid log format '{}', expected 'pretty' or 'json'",
                self.logging.format
            );
        }
        if !["console", "file", "both"].contains(&self.logging.output.as_str()) {
            anyhow::bail!(
                "Invalid log output '{}', expected 'console', 'file' or 'both'",
                self.logging.output
            );
        }
        Ok(())
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Global configuration, loading it on first access. Falls back to the
/// defaults if loading fails (the failure is reported once on stderr).
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| match Config::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Warning: using default configuration: {}", error);
            Config::default()
        }
    })
}
