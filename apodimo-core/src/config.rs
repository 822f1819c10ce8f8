//! Configuration management for Apodimo
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (APODIMO_*)
//! 3. Config file (~/.config/apodimo/config.toml)
//! 4. Default values

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default number of concurrent entity tasks and outbound requests
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Migration-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Maximum number of in-flight entity tasks and API requests
    pub concurrency: usize,

    /// Parent directory for temporary mirror clones (system temp if unset)
    pub temp_dir: Option<PathBuf>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            temp_dir: None,
        }
    }
}

/// HTTP client configuration shared by both vendor clients
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout; vendor client defaults apply when unset
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,

    /// Azure DevOps REST API version sent with every request
    pub azure_devops_api_version: String,

    /// GitHub REST API base URL
    pub github_api_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            azure_devops_api_version: "7.0".to_string(),
            github_api_url: "https://api.github.com".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Migration configuration
    pub migration: MigrationConfig,

    /// HTTP configuration
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/apodimo/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("apodimo").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - APODIMO_CONCURRENCY: Maximum in-flight tasks/requests
    /// - APODIMO_TEMP_DIR: Parent directory for mirror clones
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(concurrency) = std::env::var("APODIMO_CONCURRENCY") {
            self.migration.concurrency = concurrency.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "APODIMO_CONCURRENCY must be a positive integer, got '{}'",
                    concurrency
                ))
            })?;
        }

        if let Ok(temp_dir) = std::env::var("APODIMO_TEMP_DIR") {
            self.migration.temp_dir = Some(PathBuf::from(temp_dir));
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, concurrency: Option<usize>) -> Self {
        if let Some(n) = concurrency {
            self.migration.concurrency = n;
        }

        self
    }

    /// Reject settings the migration cannot run with
    pub fn validate(self) -> Result<Self> {
        if self.migration.concurrency == 0 {
            return Err(Error::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }

        Ok(self)
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(concurrency: Option<usize>) -> Result<Self> {
        Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(concurrency)
            .validate()
    }
}
