//! `sendoff.toml` configuration.
//!
//! ```toml
//! [server]
//! port = 8080
//! dir = "site"
//!
//! [ai]
//! model = "gemini-2.0-flash"
//! api_key_env = "GEMINI_API_KEY"
//! ```
//!
//! The API key itself never lives in the file; `api_key_env` names the
//! environment variable holding it.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub ai: AiConfig,
}

/// `[server]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listening port
    pub port: u16,
    /// Directory with the static site
    pub dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            dir: PathBuf::from("site"),
        }
    }
}

/// `[ai]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AiConfig {
    /// Model name
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Base URL of the models API
    pub endpoint: String,
    /// Upstream request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            timeout_secs: 30,
        }
    }
}

impl AiConfig {
    /// API key from the environment; blank values count as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("config: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, port: Option<u16>, dir: Option<PathBuf>) -> Self {
        if let Some(port) = port {
            self.server.port = port;
        }
        if let Some(dir) = dir {
            self.server.dir = dir;
        }
        self
    }

    /// Check that the site directory is servable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dir = &self.server.dir;
        if !dir.is_dir() {
            return Err(ConfigError::MissingSiteDir(dir.clone()));
        }
        if !dir.join("index.html").is_file() {
            return Err(ConfigError::MissingIndex(dir.clone()));
        }
        Ok(())
    }
}
