//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_API_BASE_URL` - Backend API base URL (default: `http://localhost:5056`)
//! - `STOREFRONT_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 10)
//! - `STOREFRONT_TOKEN_PATH` - File used to persist the auth token; when
//!   unset the session credential lives in memory only

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5056";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the backend API.
    pub api_base_url: Url,
    /// Timeout applied to every backend request.
    pub request_timeout: Duration,
    /// Where the auth token is persisted between sessions, if anywhere.
    pub token_path: Option<PathBuf>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if a variable is present but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests supply their own lookup instead of
    /// mutating process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if a value cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = lookup("STOREFRONT_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_base_url = Url::parse(&api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_API_BASE_URL".to_owned(), e.to_string())
        })?;

        let request_timeout = match lookup("STOREFRONT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    ConfigError::InvalidEnvVar(
                        "STOREFRONT_REQUEST_TIMEOUT_SECS".to_owned(),
                        format!("expected an integer, got {raw:?}"),
                    )
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let token_path = lookup("STOREFRONT_TOKEN_PATH").map(PathBuf::from);

        Ok(Self {
            api_base_url,
            request_timeout,
            token_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(|_| None).expect("defaults");
        assert_eq!(config.api_base_url.as_str(), "http://localhost:5056/");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.token_path.is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_API_BASE_URL" => Some("https://api.velora.example".to_owned()),
            "STOREFRONT_REQUEST_TIMEOUT_SECS" => Some("30".to_owned()),
            "STOREFRONT_TOKEN_PATH" => Some("/tmp/velora-token".to_owned()),
            _ => None,
        })
        .expect("valid config");

        assert_eq!(config.api_base_url.host_str(), Some("api.velora.example"));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.token_path, Some(PathBuf::from("/tmp/velora-token")));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_API_BASE_URL" => Some("not a url".to_owned()),
            _ => None,
        });
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(name, _)) if name == "STOREFRONT_API_BASE_URL"));
    }

    #[test]
    fn test_rejects_invalid_timeout() {
        let result = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_REQUEST_TIMEOUT_SECS" => Some("soon".to_owned()),
            _ => None,
        });
        assert!(result.is_err());
    }
}
