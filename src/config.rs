//! Configuration management using the prefer crate.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of documents per page.
pub const DEFAULT_LIMIT: u32 = 10;

/// Default collection an archive lists.
pub const DEFAULT_COLLECTION: &str = "products";

/// Environment variables that override the server URL, in priority order.
pub const SERVER_URL_ENV: &[&str] = &["SERVER_URL", "NEXT_PUBLIC_SERVER_URL"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the content server (without `/api`).
    pub server_url: String,
    /// Custom user agent; the crate default when unset.
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Page size used when an archive does not set one.
    pub default_limit: u32,
    /// Collection used when an archive does not set one.
    pub default_collection: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            user_agent: None,
            request_timeout: 30,
            default_limit: DEFAULT_LIMIT,
            default_collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl Settings {
    /// Override settings from environment variables.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override settings using the given variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = SERVER_URL_ENV
            .iter()
            .find_map(|key| lookup(key).filter(|v| !v.is_empty()))
        {
            self.server_url = url;
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the content server.
    #[serde(default)]
    pub server_url: Option<String>,
    /// Custom user agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// Default page size.
    #[serde(default)]
    pub default_limit: Option<u32>,
    /// Default collection.
    #[serde(default)]
    pub default_collection: Option<String>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers collection-archive config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("collection-archive").await {
            Ok(pref_config) => {
                let server_url: Option<String> = pref_config.get("server_url").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
                let default_limit: Option<u32> = pref_config.get("default_limit").ok();
                let default_collection: Option<String> =
                    pref_config.get("default_collection").ok();

                Config {
                    server_url,
                    user_agent,
                    request_timeout,
                    default_limit,
                    default_collection,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.server_url {
            settings.server_url = url.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(limit) = self.default_limit.filter(|l| *l > 0) {
            settings.default_limit = limit;
        }
        if let Some(ref collection) = self.default_collection {
            settings.default_collection = collection.clone();
        }
    }
}

/// Load settings from configuration and environment.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings.apply_env();
    settings
}
