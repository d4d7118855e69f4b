use http::Method;
use serde::Serialize;
use tracing::{debug, error, info};
use url::Url;

mod builder;
pub use self::builder::ApiClientBuilder;

mod auth;
pub use self::auth::{Authentication, AuthenticationError, SecureString};

mod response;
pub use self::response::ApiResponse;

mod error;
pub use self::error::ApiClientError;

use crate::config::HarnessConfig;

/// Thin HTTP client bound to a base URL and an optional bearer token.
///
/// Each operation delegates to reqwest, logs the exchange, and returns the
/// buffered [`ApiResponse`] whatever the status code — a 404 is data, not
/// an error. Only transport faults and configuration mistakes surface as
/// [`ApiClientError`]. There are no retries and no timeout policy beyond
/// what the injected reqwest client carries.
///
/// # Example
///
/// ```rust,no_run
/// use trackspec_core::ApiClient;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::builder()
///     .with_base_url("https://api.github.com")
///     .build()?;
///
/// let response = client.get("/repos/acme/widget/issues").await?;
/// assert_eq!(response.status().as_u16(), 200);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    authentication: Option<Authentication>,
}

impl ApiClient {
    /// Starts building a client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Builds a client from `TRACKSPEC_BASE_URL` / `TRACKSPEC_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Url`] when the configured base URL does
    /// not parse.
    pub fn from_env() -> Result<Self, ApiClientError> {
        HarnessConfig::from_env().client()
    }
}

impl ApiClient {
    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError`] on transport faults or URL problems.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiClientError> {
        self.request(Method::GET, path, None, None).await
    }

    /// Sends a GET request with a serialized query string.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Query`] when the query fails to
    /// serialize, otherwise as [`get`](Self::get).
    pub async fn get_with_query<Q>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<ApiResponse, ApiClientError>
    where
        Q: Serialize + ?Sized,
    {
        let query = serde_urlencoded::to_string(query)?;
        self.request(Method::GET, path, Some(query), None).await
    }

    /// Sends a POST request with an optional JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Serialize`] when the payload fails to
    /// serialize, otherwise as [`get`](Self::get).
    pub async fn post<B>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse, ApiClientError>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        self.request(Method::POST, path, None, body).await
    }

    /// Sends a PUT request with an optional JSON payload.
    ///
    /// # Errors
    ///
    /// As [`post`](Self::post).
    pub async fn put<B>(&self, path: &str, body: Option<&B>) -> Result<ApiResponse, ApiClientError>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        self.request(Method::PUT, path, None, body).await
    }

    /// Sends a PATCH request with an optional JSON payload.
    ///
    /// # Errors
    ///
    /// As [`post`](Self::post).
    pub async fn patch<B>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse, ApiClientError>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        self.request(Method::PATCH, path, None, body).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get).
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiClientError> {
        self.request(Method::DELETE, path, None, None).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<String>,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ApiClientError> {
        let url = self.build_url(path, query.as_deref())?;

        info!(%method, path, "sending request");

        let mut request = self.client.request(method.clone(), url);
        if let Some(authentication) = &self.authentication {
            let (name, value) = authentication.to_header()?;
            request = request.header(name, value);
        }
        if let Some(body) = &body {
            debug!(payload = %body, "request payload");
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = ApiResponse::read(response).await?;

        info!(%method, path, status = response.status().as_u16(), "received response");
        if !response.is_ok() {
            error!(
                %method,
                path,
                status = response.status().as_u16(),
                body = %response.text_lossy(),
                "request failed"
            );
        }

        Ok(response)
    }

    fn build_url(&self, path: &str, query: Option<&str>) -> Result<Url, ApiClientError> {
        let base = self.base_url.as_str();
        let joined = format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = joined.parse::<Url>()?;
        if let Some(query) = query
            && !query.is_empty()
        {
            url.set_query(Some(query));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::builder()
            .with_base_url(base_url)
            .build()
            .expect("valid base url")
    }

    #[test]
    fn build_url_joins_base_and_path() {
        let client = client("http://localhost:8080");
        let url = client
            .build_url("/repos/o/r/issues", None)
            .expect("valid url");
        assert_eq!(url.as_str(), "http://localhost:8080/repos/o/r/issues");
    }

    #[test]
    fn build_url_tolerates_trailing_and_leading_slashes() {
        let client = client("http://localhost:8080/");
        let url = client
            .build_url("repos/o/r/issues", None)
            .expect("valid url");
        assert_eq!(url.as_str(), "http://localhost:8080/repos/o/r/issues");
    }

    #[test]
    fn build_url_keeps_a_base_path_prefix() {
        let client = client("http://localhost:8080/api/v3");
        let url = client.build_url("/repos/o/r/issues", None).expect("valid url");
        assert_eq!(url.as_str(), "http://localhost:8080/api/v3/repos/o/r/issues");
    }

    #[test]
    fn build_url_appends_the_query_string() {
        let client = client("http://localhost:8080");
        let url = client
            .build_url("/repos/o/r/issues", Some("state=open&page=2"))
            .expect("valid url");
        assert_eq!(url.query(), Some("state=open&page=2"));
    }
}
