//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub portal: PortalConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Academic portal REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base API URL, e.g. `http://localhost:8080/api`.
    pub url: String,
    /// Bearer token of the signed-in student.
    #[serde(default)]
    pub token: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Report card output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Printed in the header and used as the department line.
    pub institution_name: String,
    /// Directory the generated files are written to.
    pub output_dir: PathBuf,
    /// Also write a spreadsheet next to the PDF.
    #[serde(default)]
    pub export_spreadsheet: bool,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Daily rolling log files are written here when set.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl AppConfig {
    /// Get config file path (platform config dir, else next to the executable).
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "report-card")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| {
                std::env::current_exe()
                    .ok()
                    .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            })
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(config) => ConfigLoadResult::Loaded(config),
                Err(e) => ConfigLoadResult::Invalid(e),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<AppConfig>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.portal.url.starts_with("http://") && !self.portal.url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "Portal URL must start with http:// or https://".to_string(),
            ));
        }
        if self.portal.timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "Portal timeout must be at least 1 second".to_string(),
            ));
        }
        if self.portal.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "Portal timeout cannot exceed 300 seconds".to_string(),
            ));
        }
        if self.report.institution_name.trim().is_empty() {
            return Err(ConfigError::Validation("Institution name cannot be empty".to_string()));
        }
        if self.report.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("Output directory cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/api".to_string(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            institution_name: "Academic Portal".to_string(),
            output_dir: PathBuf::from("reports"),
            export_spreadsheet: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
