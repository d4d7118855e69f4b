use super::auth::AuthenticationError;

/// Errors that can occur when using the [`ApiClient`](super::ApiClient).
///
/// Non-success HTTP statuses are deliberately NOT represented here: the
/// client surfaces them as data on [`ApiResponse`](super::ApiResponse) so
/// tests can assert on status codes directly. Only transport faults,
/// configuration mistakes, and decode failures become errors.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiClientError {
    /// Transport fault from the underlying reqwest client.
    ///
    /// Network, DNS, and timeout failures end up here and propagate
    /// untouched; the client adds no retry or suppression.
    Reqwest(reqwest::Error),

    /// URL parsing error when joining the base URL and a request path.
    Url(url::ParseError),

    /// Authentication material could not be turned into a header.
    Authentication(AuthenticationError),

    /// Query parameter serialization error.
    Query(serde_urlencoded::ser::Error),

    /// JSON serialization error for a request payload.
    Serialize(serde_json::Error),

    /// Response body failed to deserialize as the requested type.
    ///
    /// `path` names the field at which deserialization failed.
    #[display("failed to deserialize response at '{path}': {error}\n{body}")]
    #[from(skip)]
    Json {
        /// Field path where the decode failed.
        path: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response body that failed to parse.
        body: String,
    },

    /// Response body is not valid UTF-8 text.
    #[display("response body is not valid UTF-8: {_0}")]
    NonUtf8Body(std::str::Utf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_client_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ApiClientError>();
        assert_sync::<ApiClientError>();
    }

    #[test]
    fn json_error_display_names_the_path() {
        let error = serde_json::from_str::<u64>("\"nope\"").unwrap_err();
        let error = ApiClientError::Json {
            path: "user.id".to_string(),
            error,
            body: "{}".to_string(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("user.id"), "missing path in: {rendered}");
    }
}
