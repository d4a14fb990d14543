//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error code from server.
        code: String,
        /// Error message from server.
        message: String,
    },

    /// The server rejected the credential (401) or the identity lacks
    /// access (403). The held token has already been discarded.
    #[error("Authentication failed ({status}): {message}")]
    Auth {
        /// HTTP status code, 401 or 403.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// An id that cannot stand as a single path segment.
    #[error("Invalid path segment: {0:?}")]
    InvalidPath(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_)) || matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth { .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error response from the server.
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, alias = "error")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let auth = Error::Auth {
            status: 403,
            message: "forbidden".into(),
        };
        assert!(auth.is_auth_error());
        assert!(!auth.is_not_found());

        let missing = Error::Api {
            status: 404,
            code: "unknown".into(),
            message: "gone".into(),
        };
        assert!(missing.is_not_found());

        let server = Error::Api {
            status: 502,
            code: "unknown".into(),
            message: "bad gateway".into(),
        };
        assert!(server.is_server_error());
    }

    #[test]
    fn test_error_response_accepts_error_key() {
        let parsed: ErrorResponse = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert_eq!(parsed.message, "nope");
        assert!(parsed.code.is_none());
    }
}
