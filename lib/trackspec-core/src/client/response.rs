use std::borrow::Cow;

use bytes::Bytes;
use http::{HeaderMap, StatusCode, header};
use mime::Mime;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::ApiClientError;

/// Buffered HTTP response with fallible, on-demand body decoding.
///
/// The client wrapper returns this for every exchange, whatever the status
/// code: callers inspect [`status`](Self::status) / [`is_ok`](Self::is_ok)
/// before deciding whether to trust the body. Decoding never happens
/// implicitly.
///
/// # Example
///
/// ```rust,no_run
/// # use trackspec_core::ApiClient;
/// # async fn example(client: &ApiClient) -> anyhow::Result<()> {
/// let response = client.get("/repos/acme/widget/issues").await?;
/// assert!(response.is_ok(), "unexpected status: {}", response.status());
/// let issues: serde_json::Value = response.json()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    /// Buffers a reqwest response into an owned value.
    ///
    /// Reading the body here (rather than lazily off the socket) is what
    /// lets the client log error bodies without consuming anything the
    /// caller still wants.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, ApiClientError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_parts(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Canonical reason phrase for the status code, if one exists.
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Whether the status code is in `[200, 300)`.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Parsed `Content-Type` header, if present and well-formed.
    pub fn content_type(&self) -> Option<Mime> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Deserializes the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Json`] naming the field path at which
    /// deserialization failed.
    pub fn json<T>(&self) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        if let Some(mime) = self.content_type() {
            let is_json = mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON);
            if !is_json {
                warn!(content_type = %mime, "decoding JSON from a non-JSON content type");
            }
        }
        let mut deserializer = serde_json::Deserializer::from_slice(&self.body);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            let path = err.path().to_string();
            ApiClientError::Json {
                path,
                error: err.into_inner(),
                body: self.text_lossy().into_owned(),
            }
        })
    }

    /// Deserializes the body as an untyped [`serde_json::Value`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Json`] when the body is not valid JSON.
    pub fn json_value(&self) -> Result<serde_json::Value, ApiClientError> {
        self.json()
    }

    /// Body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::NonUtf8Body`] for non-UTF-8 bodies.
    pub fn text(&self) -> Result<&str, ApiClientError> {
        std::str::from_utf8(&self.body).map_err(ApiClientError::NonUtf8Body)
    }

    /// Body as text, replacing invalid UTF-8 sequences.
    ///
    /// Used for diagnostics where a lossy rendering beats an error.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
