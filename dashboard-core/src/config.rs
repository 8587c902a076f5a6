use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// backend_url = "http://localhost:5000"
/// timeout_secs = 30
/// debounce_ms = 300
/// min_query_chars = 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the service answering `/weather` and `/suggestions`.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Quiet period after the last keystroke before suggestions are fetched.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries shorter than this never reach the backend.
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

const fn default_timeout() -> u64 {
    30
}

const fn default_debounce_ms() -> u64 {
    300
}

const fn default_min_query_chars() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout_secs: default_timeout(),
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Replace the backend URL, dropping any trailing slash.
    pub fn set_backend_url(&mut self, url: &str) -> Result<()> {
        let trimmed = url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(anyhow!(
                "Backend URL '{url}' must start with http:// or https://"
            ));
        }

        self.backend_url = trimmed.to_string();
        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
