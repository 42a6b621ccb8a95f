//! Application-level errors

use std::fmt;

use ai_core::InferenceError;
use domain::DomainError;
use thiserror::Error;

/// Which orchestration step a hard failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Story,
    Summary,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Story => write!(f, "story"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A provider failure that has no fallback; no partial output is produced
    #[error("{stage} generation failed: {source}")]
    GenerationFailed {
        stage: GenerationStage,
        #[source]
        source: InferenceError,
    },

    /// Continuity storage failed
    #[error("Continuity store error: {0}")]
    Continuity(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    pub const fn story_failed(source: InferenceError) -> Self {
        Self::GenerationFailed {
            stage: GenerationStage::Story,
            source,
        }
    }

    pub const fn summary_failed(source: InferenceError) -> Self {
        Self::GenerationFailed {
            stage: GenerationStage::Summary,
            source,
        }
    }

    /// Whether the underlying provider asked us to slow down
    pub const fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::GenerationFailed {
                source: InferenceError::RateLimited,
                ..
            }
        )
    }
}
