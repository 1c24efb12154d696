//! Settings and configuration utilities.
//!
//! Hooks run with whatever environment git hands them, which is not always
//! the login environment. Settings are read from
//! $HOME/.precommit-message-preservation/settings.json and consulted when a
//! variable is missing from the process environment.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Directory under the home directory holding the settings file.
const SETTINGS_DIR: &str = ".precommit-message-preservation";

/// Settings loaded from $HOME/.precommit-message-preservation/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // A missing file means no overrides
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(SETTINGS_DIR).join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    ///
    /// Empty values count as unset.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => self.env.get(key).filter(|value| !value.is_empty()).cloned(),
        }
    }
}

/// Returns an environment variable with fallback to settings.
pub fn get_env_var(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => match Settings::load() {
            Ok(settings) => settings
                .get_env_var(key)
                .ok_or_else(|| anyhow::anyhow!("Environment variable not found: {}", key)),
            Err(err) => {
                // Unreadable settings are reported alongside the missing variable
                Err(anyhow::anyhow!("Environment variable not found: {}", key).context(err))
            }
        },
    }
}
