//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Language code is not in the allow-list
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Story payload does not match the narrative schema
    #[error("Invalid story payload: {0}")]
    InvalidStory(String),
}

impl DomainError {
    /// Create a validation error for a named field
    pub fn invalid_field(field: &str, reason: impl std::fmt::Display) -> Self {
        Self::ValidationError(format!("{field}: {reason}"))
    }

    /// Create a story-shape error for a named field
    pub fn invalid_story(field: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidStory(format!("{field}: {reason}"))
    }
}
