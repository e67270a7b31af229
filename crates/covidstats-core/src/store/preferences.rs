use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Application name used for config directory paths
const APP_NAME: &str = "covidstats";

/// Preferences file name
const PREFERENCES_FILE: &str = "preferences.json";

/// A flat key-value preferences file.
///
/// The whole file is rewritten synchronously on every `set`; values are
/// small, so there is no batching.
#[derive(Debug)]
pub struct Preferences {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Preferences {
    /// Open the preferences file at `path`, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;
            if contents.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str(&contents).with_context(|| {
                    format!("Failed to parse preferences file: {}", path.display())
                })?
            }
        } else {
            Map::new()
        };
        debug!(path = %path.display(), keys = values.len(), "Preferences opened");
        Ok(Self { path, values })
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a typed value. Missing keys and values of the wrong shape read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(key = key, error = %e, "Ignoring preference with unexpected type");
                None
            }
        }
    }

    /// Read a string array, or an empty one if absent or not an array of strings.
    pub fn string_array(&self, key: &str) -> Vec<String> {
        self.get(key).unwrap_or_default()
    }

    /// Store a value and write the file.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("Failed to encode preference: {}", key))?;
        self.values.insert(key.to_string(), value);
        self.save()
    }

    pub fn set_string_array(&mut self, key: &str, values: &[String]) -> Result<()> {
        self.set(key, values)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write preferences file: {}", self.path.display()))?;
        Ok(())
    }
}
