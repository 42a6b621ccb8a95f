//! Inference errors

use thiserror::Error;

/// Errors that can occur while talking to a text generation provider
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Failed to reach the provider
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request could not be sent or completed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Provider answered with something we could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider did not answer in time
    #[error("Inference timeout: {0}")]
    Timeout(String),

    /// Provider refused the request because of rate or quota limits (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Provider answered with a non-success HTTP status
    #[error("Server error: status {status}: {body}")]
    ServerError { status: u16, body: String },

    /// Client could not be constructed from configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl InferenceError {
    /// Map a non-success HTTP status to an error, treating 429 as rate limiting
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited
        } else {
            Self::ServerError {
                status: status.as_u16(),
                body,
            }
        }
    }

    /// Whether the error is a rate limit
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for InferenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
