//! Error handling for Wikidata API calls
//!
//! Every outbound request resolves to `Result<T, WikidataError>`. The resolver
//! absorbs these errors stage by stage, so they never reach the caller of
//! [`crate::EntityResolver::search`]; they exist so that a failure can never be
//! mistaken for a payload.

use thiserror::Error;

/// Maximum number of body characters kept on an HTTP error
pub const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Failure of a single Wikidata API call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WikidataError {
    /// The server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Network failure, timeout, or the client could not send the request
    #[error("Request error: {0}")]
    Transport(String),

    /// Success status, but the body is not the structure we expected
    #[error("Unexpected response: {0}")]
    Protocol(String),
}

impl WikidataError {
    /// Build an HTTP error, keeping only a short preview of the body
    pub fn http(status: u16, body: &str) -> Self {
        Self::Http {
            status,
            body: body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect(),
        }
    }

    /// Whether the failure happened before any response was received
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for WikidataError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            WikidataError::Protocol(error.to_string())
        } else {
            WikidataError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for WikidataError {
    fn from(error: serde_json::Error) -> Self {
        WikidataError::Protocol(format!(
            "JSON parse error at line {} col {}: {}",
            error.line(),
            error.column(),
            error
        ))
    }
}
