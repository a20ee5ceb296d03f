//! Client configuration management.
//!
//! The configuration names the Bounce API base URL, how the token is
//! framed in the `Authorization` header, an optional request timeout and
//! the last username that signed in.
//!
//! Configuration is stored at `<config dir>/bounce/config.json`. The
//! `BOUNCE_API_URL` and `BOUNCE_AUTH_SCHEME` environment variables
//! override the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "bounce";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const API_URL_ENV: &str = "BOUNCE_API_URL";
pub const AUTH_SCHEME_ENV: &str = "BOUNCE_AUTH_SCHEME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// Scheme placed before the token, e.g. `Bearer`. The raw token is
    /// sent when unset.
    pub auth_scheme: Option<String>,
    /// No timeout is applied when unset
    pub request_timeout_secs: Option<u64>,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_scheme: None,
            request_timeout_secs: None,
            last_username: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `BOUNCE_API_URL` and `BOUNCE_AUTH_SCHEME` from the environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(AUTH_SCHEME_ENV).ok(),
        );
    }

    /// Empty values are ignored for the URL and clear the scheme
    pub fn apply_overrides(&mut self, base_url: Option<String>, auth_scheme: Option<String>) {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(scheme) = auth_scheme {
            let scheme = scheme.trim();
            self.auth_scheme = (!scheme.is_empty()).then(|| scheme.to_string());
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the persisted session
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
