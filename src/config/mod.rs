//! Configuration management for TaskDesk

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Backend used when neither a flag, environment variable, nor config file
/// names one.
pub const DEFAULT_API_URL: &str = "https://task-manager-app-jam5.onrender.com";

/// File name of the persisted session, stored next to the config file
const SESSION_FILE: &str = "session.json";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Task Manager backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".taskdesk").join("config.yaml"))
    }

    /// Resolve an optional override into a concrete config path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional path.
    ///
    /// A missing file yields the defaults: the only required setting, the
    /// API URL, has a built-in fallback.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Resolve the backend base URL.
    ///
    /// Precedence: explicit override (flag or env) > config file > built-in
    /// fallback. Trailing slashes are dropped so paths can be appended.
    pub fn resolve_api_url(&self, override_url: Option<&str>) -> String {
        let url = override_url
            .filter(|u| !u.trim().is_empty())
            .or(self.api_url.as_deref().filter(|u| !u.trim().is_empty()))
            .unwrap_or(DEFAULT_API_URL);

        url.trim().trim_end_matches('/').to_string()
    }

    /// Path of the persisted session that belongs to a config file
    pub fn session_path(config_path: Option<&str>) -> Result<PathBuf> {
        let config_path = Self::resolve_path(config_path)?;
        let dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(dir.join(SESSION_FILE))
    }
}
