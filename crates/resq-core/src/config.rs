//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! cache location, optional remote dataset URLs, the connectivity probe
//! target, storage timeout and sync retry count.
//!
//! Configuration is stored at `~/.config/resq360/config.json`. The cache
//! directory can be overridden with the `RESQ_CACHE_DIR` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_STORAGE_TIMEOUT;
use crate::probe::DEFAULT_PROBE_URL;
use crate::sync::RetryPolicy;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "resq360";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the cache directory
pub const CACHE_DIR_ENV: &str = "RESQ_CACHE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub cache_dir: Option<PathBuf>,
    /// JSON endpoint serving emergency numbers; bundled data when unset
    pub numbers_url: Option<String>,
    /// JSON endpoint serving legal information; bundled data when unset
    pub legal_url: Option<String>,
    pub probe_url: Option<String>,
    pub query_timeout_ms: Option<u64>,
    pub sync_retries: Option<u32>,
    /// Never sync; serve whatever is cached
    pub offline_mode: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
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

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Cache directory: environment override, then config, then the platform cache dir.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CACHE_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn probe_url(&self) -> &str {
        self.probe_url.as_deref().unwrap_or(DEFAULT_PROBE_URL)
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_STORAGE_TIMEOUT)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_retries(self.sync_retries.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(!config.offline_mode);
        assert_eq!(config.probe_url(), DEFAULT_PROBE_URL);
        assert_eq!(config.query_timeout(), DEFAULT_STORAGE_TIMEOUT);
        assert_eq!(config.retry_policy(), RetryPolicy::none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            legal_url: Some("https://example.org/legal.json".into()),
            query_timeout_ms: Some(750),
            sync_retries: Some(9),
            offline_mode: true,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.legal_url.as_deref(), Some("https://example.org/legal.json"));
        assert_eq!(loaded.query_timeout(), Duration::from_millis(750));
        assert_eq!(loaded.retry_policy().max_retries, crate::sync::MAX_SYNC_RETRIES);
        assert!(loaded.offline_mode);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "offline_mode": true }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.offline_mode);
        assert!(config.numbers_url.is_none());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
