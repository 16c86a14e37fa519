//! API credential checks and `TmdbClient` construction.

use std::time::Duration;

use url::Url;
use watchbox_api::tmdb::TmdbClient;

use crate::CoreError;

/// Placeholder value shipped in example configuration files.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Settings needed to talk to the movie catalog.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    /// API credential.
    pub api_key: Option<String>,
    /// Base URL override (defaults to TMDB v3).
    pub base_url: Option<String>,
    /// Response language.
    pub language: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

/// Checks that an API key is present and not the placeholder.
///
/// # Errors
///
/// Returns [`CoreError::Configuration`] for a missing, blank, or placeholder key.
pub fn validate_api_key(api_key: Option<&str>) -> Result<&str, CoreError> {
    let key = api_key.map(str::trim).unwrap_or_default();
    if key.is_empty() {
        return Err(CoreError::Configuration(String::from(
            "set `tmdb.api_key` in config.toml or the TMDB_API_KEY environment variable",
        )));
    }
    if key == PLACEHOLDER_API_KEY {
        return Err(CoreError::Configuration(String::from(
            "replace the placeholder key with a key from themoviedb.org",
        )));
    }
    Ok(key)
}

/// Validates the credential and builds a catalog client.
///
/// No request is issued when validation fails.
///
/// # Errors
///
/// Returns [`CoreError::Configuration`] if the key is invalid, the base URL
/// cannot be parsed, or the HTTP client cannot be built.
pub fn build_client(settings: &CatalogSettings) -> Result<TmdbClient, CoreError> {
    let api_key = validate_api_key(settings.api_key.as_deref())?;

    let mut builder = TmdbClient::builder()
        .api_key(api_key)
        .user_agent(settings.user_agent.as_str())
        .language(settings.language.as_str())
        .timeout(settings.timeout);

    if let Some(ref raw) = settings.base_url {
        // `Url::join` drops the last segment unless the base ends with '/'.
        let normalized = if raw.ends_with('/') {
            raw.clone()
        } else {
            format!("{raw}/")
        };
        let url = Url::parse(&normalized)
            .map_err(|e| CoreError::Configuration(format!("invalid base URL {raw}: {e}")))?;
        builder = builder.base_url(url);
    }

    builder
        .build()
        .map_err(|e| CoreError::Configuration(format!("{e:#}")))
}
