//! Application configuration management.
//!
//! This module handles loading the application configuration:
//! which endpoint to fetch from and where the preferences file lives.
//!
//! Configuration is stored at `~/.config/covidstats/config.json`. The
//! `COVIDSTATS_ENDPOINT` and `COVIDSTATS_PREFS` environment variables
//! override the file.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::GLOBAL_STATS_URL;
use crate::store::Preferences;

/// Application name used for config directory paths
const APP_NAME: &str = "covidstats";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the stats endpoint
pub const ENDPOINT_ENV: &str = "COVIDSTATS_ENDPOINT";

/// Environment variable overriding the preferences file
pub const PREFS_ENV: &str = "COVIDSTATS_PREFS";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub endpoint: Option<String>,
    pub preferences_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides; `lookup` stands in for `std::env::var`.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            self.endpoint = Some(endpoint);
        }
        if let Some(prefs) = lookup(PREFS_ENV).filter(|v| !v.is_empty()) {
            self.preferences_path = Some(PathBuf::from(prefs));
        }
        self
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(GLOBAL_STATS_URL)
    }

    pub fn preferences_path(&self) -> Result<PathBuf> {
        match self.preferences_path {
            Some(ref path) => Ok(path.clone()),
            None => Preferences::default_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint(), GLOBAL_STATS_URL);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_env_overrides(|key| match key {
            ENDPOINT_ENV => Some("http://localhost:8080/stats".to_string()),
            PREFS_ENV => Some("/tmp/prefs.json".to_string()),
            _ => None,
        });
        assert_eq!(config.endpoint(), "http://localhost:8080/stats");
        assert_eq!(
            config.preferences_path().unwrap(),
            PathBuf::from("/tmp/prefs.json")
        );
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let base = Config {
            endpoint: Some("http://mirror/stats".to_string()),
            preferences_path: None,
        };
        let config = base.clone().with_env_overrides(|_| Some(String::new()));
        assert_eq!(config, base);
    }

    #[test]
    fn test_parse_config_file() {
        let config: Config =
            serde_json::from_str(r#"{"endpoint": "http://mirror/stats"}"#).unwrap();
        assert_eq!(config.endpoint(), "http://mirror/stats");
        assert!(config.preferences_path.is_none());
    }
}
