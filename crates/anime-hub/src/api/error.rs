//! Errors surfaced by the API client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No API key has been configured; no request was sent
    #[error("API key not configured")]
    CredentialMissing,

    /// The server answered with a non-success status
    #[error("API request failed with status {status}")]
    RequestFailed { status: u16 },

    /// Transport failure (connection, timeout, invalid URL)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not JSON, or not the JSON shape expected
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the caller should prompt for an API key
    pub fn needs_credential(&self) -> bool {
        matches!(self, ApiError::CredentialMissing)
    }
}
