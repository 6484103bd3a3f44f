//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Webcast API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Webcast API configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// Project API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// API domain override (e.g. `http://fast.api.liquidplatform.com`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Picks the API key: `--api-key` flag, then `WEBCAST_API_KEY`, then config.
///
/// Blank values are skipped.
///
/// # Errors
///
/// Returns an error if no source provides a non-blank key.
pub fn resolve_api_key(
    flag: Option<String>,
    env: Option<String>,
    config: &AppConfig,
) -> Result<String> {
    let from_config = config.api.key.clone();
    if let Some(key) = [flag, env, from_config]
        .into_iter()
        .flatten()
        .find(|k| !k.trim().is_empty())
    {
        return Ok(key);
    }
    bail!("API key is required: pass --api-key, set WEBCAST_API_KEY, or run `webcast config set-key`");
}
