//! Environment-driven harness configuration.

use crate::client::{ApiClient, ApiClientError, SecureString};
use crate::logging::LogConfig;

const BASE_URL_ENV: &str = "TRACKSPEC_BASE_URL";
const TOKEN_ENV: &str = "TRACKSPEC_TOKEN";
const LOG_DIR_ENV: &str = "TRACKSPEC_LOG_DIR";

/// Base URL used when `TRACKSPEC_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Configuration for one harness process.
///
/// The log *level* is not part of this struct; the subscriber reads it
/// directly from `TRACKSPEC_LOG` (see [`crate::logging`]).
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the API under test.
    pub base_url: String,
    /// Bearer token, if the API requires one.
    pub token: Option<SecureString>,
    /// Log sink configuration.
    pub log: LogConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            log: LogConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Reads configuration from the environment.
    ///
    /// `TRACKSPEC_BASE_URL` overrides the base URL, `TRACKSPEC_TOKEN`
    /// supplies the bearer token, `TRACKSPEC_LOG_DIR` relocates the log
    /// files. Empty or whitespace-only values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base_url) = env_var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(token) = env_var(TOKEN_ENV) {
            config.token = Some(token.into());
        }
        if let Some(directory) = env_var(LOG_DIR_ENV) {
            config.log.directory = directory.into();
        }
        config
    }

    /// Builds an [`ApiClient`] bound to the configured base URL and token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Url`] when the base URL does not parse.
    pub fn client(&self) -> Result<ApiClient, ApiClientError> {
        let mut builder = ApiClient::builder().with_base_url(&self.base_url);
        if let Some(token) = &self.token {
            builder = builder.with_token(token.clone());
        }
        builder.build()
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_the_public_api() {
        let config = HarnessConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.token.is_none());
    }

    #[test]
    fn client_builds_from_explicit_settings() {
        let config = HarnessConfig {
            base_url: "http://localhost:9999".to_string(),
            token: Some("test-token".into()),
            log: LogConfig::default(),
        };
        assert!(config.client().is_ok());
    }

    #[test]
    fn client_rejects_a_broken_base_url() {
        let config = HarnessConfig {
            base_url: "::not-a-url::".to_string(),
            token: None,
            log: LogConfig::default(),
        };
        assert!(config.client().is_err());
    }

    #[test]
    fn unset_env_vars_fall_back_to_defaults() {
        // The TRACKSPEC_* variables are not set under `cargo test`.
        let config = HarnessConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
