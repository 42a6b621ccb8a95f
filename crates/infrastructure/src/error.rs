//! Infrastructure error types

use ai_core::InferenceError;
use ai_speech::SpeechError;
use application::ApplicationError;
use thiserror::Error;

/// Errors raised while loading configuration or wiring the application
#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Text generation provider setup failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("Speech backend setup failed: {0}")]
    Speech(#[from] SpeechError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Failed to initialize tracing: {0}")]
    Telemetry(String),
}
