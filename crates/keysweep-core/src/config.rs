//! Configuration management for Keysweep.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// This is loaded from `~/.config/keysweep/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Hosting-API access settings
    pub host: HostConfig,
    /// Issuing-service validation settings
    pub issuer: IssuerConfig,
    /// Scheduler and worker-pool settings
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `KEYSWEEP_HOST_TOKEN`: Override the hosting-API access token
    /// - `KEYSWEEP_MAX_WORKERS`: Override the worker-pool bound
    /// - `KEYSWEEP_TICK_INTERVAL_MS`: Override the scheduler tick interval
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        // Override from environment
        if let Ok(val) = std::env::var("KEYSWEEP_HOST_TOKEN") {
            if !val.is_empty() {
                config.host.access_token = val;
                tracing::debug!("Override host.access_token from env");
            }
        }

        if let Ok(val) = std::env::var("KEYSWEEP_MAX_WORKERS") {
            if let Ok(workers) = val.parse() {
                config.scheduler.max_workers = workers;
                tracing::debug!("Override scheduler.max_workers from env: {}", workers);
            }
        }

        if let Ok(val) = std::env::var("KEYSWEEP_TICK_INTERVAL_MS") {
            if let Ok(ms) = val.parse() {
                config.scheduler.tick_interval_ms = ms;
                tracing::debug!("Override scheduler.tick_interval_ms from env: {}", ms);
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/keysweep/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "keysweep", "keysweep").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Hosting-API access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Bearer token for the hosting API's search/content endpoints
    pub access_token: String,
    /// Base URL of the hosting API
    pub api_base_url: String,
    /// Hard cap on search pages fetched per query
    pub max_pages: u32,
    /// Results requested per page
    pub per_page: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_base_url: "https://api.github.com".to_string(),
            max_pages: 100,
            per_page: 100,
            timeout_secs: 30,
            user_agent: "keysweep/0.1".to_string(),
        }
    }
}

/// Issuing-service validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerConfig {
    /// Base URL of the issuing service used for liveness checks
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Scheduler and worker-pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum number of concurrently running sweep workers
    pub max_workers: usize,
    /// Scheduler tick interval in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            tick_interval_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host.max_pages, 100);
        assert_eq!(config.host.per_page, 100);
        assert_eq!(config.scheduler.max_workers, 4);
        assert_eq!(config.scheduler.tick_interval_ms, 1000);
        assert!(config.host.access_token.is_empty());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = AppConfig::default();
        config.host.access_token = "ghp_test".to_string();
        config.scheduler.max_workers = 8;

        let toml_str = toml::to_string_pretty(&config).expect("serialize config");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse config");

        assert_eq!(parsed.host.access_token, "ghp_test");
        assert_eq!(parsed.scheduler.max_workers, 8);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            [scheduler]
            max_workers = 2
        "#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.scheduler.max_workers, 2);
        // Untouched sections fall back to defaults
        assert_eq!(config.host.api_base_url, "https://api.github.com");
        assert_eq!(config.scheduler.tick_interval_ms, 1000);
    }
}
