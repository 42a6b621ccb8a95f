//! Port definitions for text generation
//!
//! Defines the trait (port) that every LLM backend implements. Calls are
//! blocking; each backend owns a pooled `reqwest::blocking::Client`.

use serde::{Deserialize, Serialize};

use crate::config::LlmProvider;
use crate::error::InferenceError;

/// What the completion is for; selects model and sampling defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionPurpose {
    Story,
    Summary,
}

impl CompletionPurpose {
    /// Sampling temperature used for this purpose
    pub const fn temperature(self) -> f32 {
        match self {
            Self::Story => 0.7,
            Self::Summary => 0.1,
        }
    }
}

/// A single prompt-to-text request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub purpose: CompletionPurpose,
    /// Instruction framing the task
    pub system: String,
    /// Task input
    pub prompt: String,
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Story request with story sampling defaults
    pub fn story(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            purpose: CompletionPurpose::Story,
            system: system.into(),
            prompt: prompt.into(),
            temperature: CompletionPurpose::Story.temperature(),
            max_tokens: 1200,
        }
    }

    /// Summary request with summary sampling defaults
    pub fn summary(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            purpose: CompletionPurpose::Summary,
            system: system.into(),
            prompt: prompt.into(),
            temperature: CompletionPurpose::Summary.temperature(),
            max_tokens: 400,
        }
    }

    /// Override the token limit
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Port for LLM backends
///
/// Implementations are shared across request threads and must not hold
/// per-request state.
#[cfg_attr(test, mockall::automock)]
pub trait TextGenerator: Send + Sync {
    /// Provider behind this generator
    fn kind(&self) -> LlmProvider;

    /// Generate raw completion text for the request
    fn complete(&self, request: &CompletionRequest) -> Result<String, InferenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_defaults() {
        let request = CompletionRequest::story("sys", "prompt");
        assert_eq!(request.purpose, CompletionPurpose::Story);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 1200);
    }

    #[test]
    fn summary_defaults() {
        let request = CompletionRequest::summary("sys", "text").with_max_tokens(200);
        assert!((request.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 200);
    }

    #[test]
    fn mock_generator_can_stand_in() {
        let mut mock = MockTextGenerator::new();
        mock.expect_kind().return_const(LlmProvider::Ollama);
        mock.expect_complete()
            .returning(|_| Ok("{\"ok\": true}".to_string()));

        let generator: &dyn TextGenerator = &mock;
        assert_eq!(generator.kind(), LlmProvider::Ollama);
        assert!(generator.complete(&CompletionRequest::story("", "")).is_ok());
    }
}
