//! Story generation orchestration
//!
//! Picks the generation path for the active provider, parses the structured
//! story out of the model output and runs it through the content sanitizer.
//! Cloud output must be exactly one JSON document; local and hosted output may
//! carry commentary around the object.
//!
//! Failure handling differs by provider:
//! - cloud (OpenAI): rate limiting serves the stub; every other failure,
//!   malformed output included, is a hard `GenerationFailed`
//! - local (Ollama) and hosted (HuggingFace): any failure serves the stub

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use ai_core::{
    CompletionRequest, InferenceError, LlmProvider, ProviderRegistry, TextGenerator, extract_json,
    parse_json,
};
use domain::{StoryPayload, StoryRequest};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::content_sanitizer::ContentSanitizer;
use super::prompt_builder::{CLOUD_STORY_SYSTEM, LOCAL_STORY_INSTRUCTION, build_story_prompt};
use crate::error::ApplicationError;

/// Token budget for hosted story generation
const HOSTED_STORY_MAX_TOKENS: u32 = 800;

/// How a story was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryOutcome {
    /// The fixed stub story was served
    Stubbed,
    /// A provider produced the story
    Generated,
}

impl fmt::Display for StoryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stubbed => write!(f, "stubbed"),
            Self::Generated => write!(f, "generated"),
        }
    }
}

/// A sanitized story and how it was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStory {
    pub payload: StoryPayload,
    pub outcome: StoryOutcome,
}

/// Service for generating stories
#[derive(Debug, Clone)]
pub struct StoryService {
    registry: ProviderRegistry,
    sanitizer: Arc<ContentSanitizer>,
}

impl StoryService {
    pub const fn new(registry: ProviderRegistry, sanitizer: Arc<ContentSanitizer>) -> Self {
        Self {
            registry,
            sanitizer,
        }
    }

    /// Generate and sanitize a story for the request
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::GenerationFailed` only for non-rate-limit
    /// failures of the cloud provider. Every other failure serves the stub.
    #[instrument(skip(self, request, previous_summary), fields(
        provider = %self.registry.active_provider(),
        sequel = previous_summary.is_some()
    ))]
    pub fn generate(
        &self,
        request: &StoryRequest,
        previous_summary: Option<&str>,
    ) -> Result<GeneratedStory, ApplicationError> {
        let prompt = build_story_prompt(request, previous_summary);

        let (payload, outcome) = match self.registry.generator() {
            None => {
                info!("Stub providers required; serving stub story");
                (StoryPayload::stub(), StoryOutcome::Stubbed)
            },
            Some(generator) => match generator.kind() {
                LlmProvider::OpenAi => generate_cloud(generator.as_ref(), &prompt)?,
                LlmProvider::Ollama | LlmProvider::HuggingFace => {
                    generate_local(generator.as_ref(), &prompt)
                },
            },
        };

        let payload = match self.sanitizer.sanitize(&payload, &request.controls) {
            Cow::Owned(sanitized) => sanitized,
            Cow::Borrowed(_) => payload,
        };

        info!(outcome = %outcome, "Story ready");
        Ok(GeneratedStory { payload, outcome })
    }
}

fn validated(payload: StoryPayload) -> Result<StoryPayload, InferenceError> {
    payload
        .validate()
        .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;
    Ok(payload)
}

fn generate_cloud(
    generator: &dyn TextGenerator,
    prompt: &str,
) -> Result<(StoryPayload, StoryOutcome), ApplicationError> {
    let request = CompletionRequest::story(CLOUD_STORY_SYSTEM, prompt);

    let raw = match generator.complete(&request) {
        Ok(raw) => raw,
        Err(InferenceError::RateLimited) => {
            warn!("Cloud provider rate limited; serving stub story");
            return Ok((StoryPayload::stub(), StoryOutcome::Stubbed));
        },
        Err(e) => {
            warn!(error = %e, "Cloud story request failed");
            return Err(ApplicationError::story_failed(e));
        },
    };

    let payload = parse_json(&raw).and_then(validated).map_err(|e| {
        warn!(error = %e, "Cloud provider returned an unusable story");
        ApplicationError::story_failed(e)
    })?;

    Ok((payload, StoryOutcome::Generated))
}

fn generate_local(generator: &dyn TextGenerator, prompt: &str) -> (StoryPayload, StoryOutcome) {
    let kind = generator.kind();
    let mut request = CompletionRequest::story(LOCAL_STORY_INSTRUCTION, prompt);
    if kind == LlmProvider::HuggingFace {
        request = request.with_max_tokens(HOSTED_STORY_MAX_TOKENS);
    }

    match generator
        .complete(&request)
        .and_then(|raw| extract_json(&raw))
        .and_then(validated)
    {
        Ok(payload) => (payload, StoryOutcome::Generated),
        Err(e) => {
            warn!(provider = %kind, error = %e, "Story generation failed; serving stub story");
            (StoryPayload::stub(), StoryOutcome::Stubbed)
        },
    }
}
