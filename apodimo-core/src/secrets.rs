//! Secrets management for Apodimo
//!
//! Personal access tokens are stored separately from configuration to avoid
//! accidental sharing. The secrets file is located at
//! `~/.config/apodimo/secrets.toml` and must have restrictive permissions
//! (0600 on Unix).
//!
//! Loading priority:
//! 1. CLI flag (`--azdoToken` / `--gitHubToken`)
//! 2. Environment variables (AZURE_DEVOPS_TOKEN / GITHUB_TOKEN), including `.env`
//! 3. Secrets file (~/.config/apodimo/secrets.toml)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// Azure DevOps configuration
    pub azure_devops: TokenSecrets,

    /// GitHub configuration
    pub github: TokenSecrets,
}

/// A personal access token entry
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenSecrets {
    /// Personal Access Token
    pub token: Option<String>,
}

impl std::fmt::Debug for TokenSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSecrets")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        let secrets_path = Self::default_secrets_path();

        if let Some(path) = secrets_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            let mode = metadata.permissions().mode();

            // readable by group or others
            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        for entry in [&mut secrets.azure_devops, &mut secrets.github] {
            if let Some(ref mut token) = entry.token {
                *token = token.trim().to_string();
            }
        }

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/apodimo/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("apodimo").join("secrets.toml"))
    }

    /// Resolve the Azure DevOps token, preferring an explicit value
    pub fn azure_devops_token(&self, explicit: Option<String>) -> Option<String> {
        resolve(explicit, &self.azure_devops, "Azure DevOps")
    }

    /// Resolve the GitHub token, preferring an explicit value
    pub fn github_token(&self, explicit: Option<String>) -> Option<String> {
        resolve(explicit, &self.github, "GitHub")
    }
}

fn resolve(explicit: Option<String>, stored: &TokenSecrets, vendor: &str) -> Option<String> {
    if let Some(token) = explicit {
        let token = token.trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }

    match stored.token {
        Some(ref token) if !token.is_empty() => {
            debug!(vendor, "Using token from secrets file");
            Some(token.clone())
        }
        _ => None,
    }
}
