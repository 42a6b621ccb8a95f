//! Speech synthesis errors

use thiserror::Error;

/// Errors that can occur while rendering narration
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Failed to connect to speech service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to speech service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Synthesis failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Invalid response from service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during processing
    #[error("Speech synthesis timeout: {0}")]
    Timeout(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Service answered with a non-success status
    #[error("Service error: status {status}: {body}")]
    ServiceError { status: u16, body: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider not available (not installed or configured)
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    /// WebSocket stream broke before the turn ended
    #[error("Stream error: {0}")]
    Stream(String),

    /// Synthesis finished without producing audio
    #[error("No audio produced")]
    EmptyAudio,
}

impl SpeechError {
    /// Map a non-success HTTP status, treating 429 as rate limiting
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited
        } else {
            Self::ServiceError {
                status: status.as_u16(),
                body,
            }
        }
    }
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for SpeechError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;
        match err {
            WsError::Io(e) => Self::ConnectionFailed(e.to_string()),
            WsError::Http(response) => Self::ServiceError {
                status: response.status().as_u16(),
                body: String::new(),
            },
            other => Self::Stream(other.to_string()),
        }
    }
}
