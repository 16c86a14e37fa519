//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use watchbox_api::tmdb::DEFAULT_IMAGE_BASE_URL;
use watchbox_core::credentials::CatalogSettings;
use watchbox_core::watchlist::DEFAULT_STORAGE_KEY;

/// Environment variable that overrides `tmdb.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default suggestion debounce in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Movie catalog settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Watchlist storage settings.
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    /// Search settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Movie catalog configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// API key. Overridden by `TMDB_API_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Image base URL for poster and profile paths.
    pub image_base_url: String,
    /// Response language.
    pub language: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            image_base_url: String::from(DEFAULT_IMAGE_BASE_URL),
            language: String::from("en-US"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Watchlist storage configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WatchlistConfig {
    /// Key of the durable slot holding the list.
    pub storage_key: String,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            storage_key: String::from(DEFAULT_STORAGE_KEY),
        }
    }
}

/// Search configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Suggestion debounce in milliseconds.
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl SearchConfig {
    /// Returns the debounce interval.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
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

    /// Replaces the file's API key with `env_key` when it is set and non-empty.
    #[must_use]
    pub fn with_api_key_override(mut self, env_key: Option<String>) -> Self {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.tmdb.api_key = Some(key);
        }
        self
    }

    /// Builds the catalog settings for client construction.
    #[must_use]
    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            api_key: self.tmdb.api_key.clone(),
            base_url: self.tmdb.base_url.clone(),
            language: self.tmdb.language.clone(),
            timeout: Duration::from_secs(self.tmdb.timeout_secs),
            user_agent: String::from(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            )),
        }
    }
}
