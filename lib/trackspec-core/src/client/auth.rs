use std::fmt;

use http::HeaderValue;
use reqwest::header::{AUTHORIZATION, HeaderName};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors that can occur when turning authentication material into headers.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum AuthenticationError {
    /// Bearer token contains characters that are not valid in an HTTP header.
    #[display("bearer token contains invalid characters: {message}")]
    InvalidBearerToken {
        /// Description of the offending input.
        message: String,
    },
}

/// Wrapper for sensitive string data that zeroes its memory on drop.
///
/// The `Debug` implementation redacts the value so tokens never leak into
/// logs or assertion output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

/// Authentication scheme applied to every request the client sends.
///
/// The issue-tracker APIs this harness targets use bearer tokens
/// (`Authorization: Bearer <token>`); the token is bound once at client
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    /// Bearer token authentication (RFC 6750).
    Bearer(SecureString),
}

impl Authentication {
    /// Converts the authentication into an HTTP header pair.
    ///
    /// The produced value is marked sensitive so reqwest's debug output
    /// redacts it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::InvalidBearerToken`] when the token
    /// contains characters that cannot appear in a header value.
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue), AuthenticationError> {
        match self {
            Authentication::Bearer(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|err| AuthenticationError::InvalidBearerToken {
                        message: err.to_string(),
                    })?;
                value.set_sensitive(true);
                Ok((AUTHORIZATION, value))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_string_debug_is_redacted() {
        let secret = SecureString::from("super-secret-token");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("super-secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn bearer_produces_authorization_header() {
        let auth = Authentication::Bearer("abc123".into());
        let (name, value) = auth.to_header().expect("valid token");
        assert_eq!(name, AUTHORIZATION);
        assert!(value.is_sensitive());
    }

    #[test]
    fn bearer_rejects_control_characters() {
        let auth = Authentication::Bearer("bad\ntoken".into());
        let result = auth.to_header();
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidBearerToken { .. })
        ));
    }
}
