use url::Url;

use super::auth::{Authentication, SecureString};
use super::{ApiClient, ApiClientError};

/// Builder for [`ApiClient`] instances.
///
/// # Default Configuration
///
/// - **Base URL**: `http://127.0.0.1` (override for anything real)
/// - **Authentication**: none
///
/// # Example
///
/// ```rust
/// use trackspec_core::ApiClient;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_base_url("https://api.github.com")
///     .with_token("ghp_example")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClientBuilder {
    client: reqwest::Client,
    base_url: String,
    authentication: Option<Authentication>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "http://127.0.0.1".to_string(),
            authentication: None,
        }
    }
}

impl ApiClientBuilder {
    /// Sets the base URL all request paths are joined onto.
    ///
    /// A trailing slash is tolerated; path joining trims it.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets bearer-token authentication for every request.
    pub fn with_token(self, token: impl Into<SecureString>) -> Self {
        self.with_authentication(Authentication::Bearer(token.into()))
    }

    /// Sets an explicit authentication scheme.
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Replaces the underlying reqwest client, e.g. to set timeouts.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Builds the final [`ApiClient`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Url`] when the base URL does not parse.
    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let Self {
            client,
            base_url,
            authentication,
        } = self;

        let base_url = base_url.parse::<Url>()?;

        Ok(ApiClient {
            client,
            base_url,
            authentication,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builder_builds() {
        let client = ApiClientBuilder::default().build();
        assert!(client.is_ok());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ApiClientBuilder::default()
            .with_base_url("not a url")
            .build();
        assert!(matches!(result, Err(ApiClientError::Url(_))));
    }
}
