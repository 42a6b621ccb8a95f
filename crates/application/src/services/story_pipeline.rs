//! End-to-end story pipeline
//!
//! request → story → narration → summary → child memory
//!
//! The story step may fail hard (cloud provider errors). Narration never
//! fails. A failed summary is logged and leaves the memory untouched.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::{
    ChildMemory, ContinuitySummary, Language, MemorySnapshot, StoryPayload, StoryRequest,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::content_sanitizer::{ContentSanitizer, SafetyReport};
use super::narration_service::NarrationService;
use super::story_service::{StoryOutcome, StoryService};
use super::summary_service::SummaryService;
use crate::error::ApplicationError;
use crate::ports::ContinuityStore;

/// Everything produced for one story request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryResponse {
    pub story: StoryPayload,
    pub audio_url: Option<String>,
    pub voice: Option<String>,
    pub language: Language,
    pub duration_minutes: u8,
    pub outcome: StoryOutcome,
    /// Child memory after this story, absent when summarization failed
    pub memory_snapshot: Option<MemorySnapshot>,
    pub created_at: DateTime<Utc>,
}

/// Orchestrates the story services around the continuity store
pub struct StoryPipeline {
    stories: StoryService,
    narration: NarrationService,
    summaries: SummaryService,
    sanitizer: Arc<ContentSanitizer>,
    store: Arc<dyn ContinuityStore>,
}

impl fmt::Debug for StoryPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryPipeline")
            .field("stories", &self.stories)
            .field("narration", &self.narration)
            .finish_non_exhaustive()
    }
}

impl StoryPipeline {
    pub fn new(
        stories: StoryService,
        narration: NarrationService,
        summaries: SummaryService,
        sanitizer: Arc<ContentSanitizer>,
        store: Arc<dyn ContinuityStore>,
    ) -> Self {
        Self {
            stories,
            narration,
            summaries,
            sanitizer,
            store,
        }
    }

    /// Generate, narrate and remember a story
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::GenerationFailed` when story generation fails
    /// without fallback, and `ApplicationError::Continuity` when the store
    /// cannot be read or written.
    #[instrument(skip(self, request), fields(
        language = %request.language,
        sequel = request.sequel
    ))]
    pub fn generate(&self, request: &StoryRequest) -> Result<StoryResponse, ApplicationError> {
        let alias = request.child_alias();
        let memory = self.store.load(&alias)?;

        let previous_summary = if request.sequel {
            memory.as_ref().and_then(ChildMemory::previous_summary)
        } else {
            None
        };
        if request.sequel && previous_summary.is_none() {
            info!("Sequel requested but no previous story is remembered");
        }

        let story = self
            .stories
            .generate(request, previous_summary.as_deref())?;
        let audio = self
            .narration
            .render(&story.payload, &request.language, request.voice.as_ref());

        let memory_snapshot = match self.summaries.summarize(&story.payload.full_text()) {
            Ok(summary) => {
                let mut memory = memory.unwrap_or_else(|| ChildMemory::new(alias));
                memory.merge(&summary, story.payload.suggested_sequel_hook.as_deref());
                self.store.save(&memory)?;
                Some(memory.snapshot())
            },
            Err(e) => {
                warn!(error = %e, "Summary generation failed; memory not updated");
                None
            },
        };

        info!(
            outcome = %story.outcome,
            has_audio = audio.has_audio(),
            remembered = memory_snapshot.is_some(),
            "Story pipeline finished"
        );

        Ok(StoryResponse {
            story: story.payload,
            audio_url: audio.audio_url,
            voice: audio.voice,
            language: request.language.clone(),
            duration_minutes: request.target_duration_minutes,
            outcome: story.outcome,
            memory_snapshot,
            created_at: Utc::now(),
        })
    }

    /// Summarize standalone story text
    ///
    /// # Errors
    ///
    /// Same as [`SummaryService::summarize`].
    pub fn summarize(&self, story_text: &str) -> Result<ContinuitySummary, ApplicationError> {
        self.summaries.summarize(story_text)
    }

    /// Screen free text for banned terms
    pub fn validate(&self, story_text: &str) -> SafetyReport {
        self.sanitizer.validate_text(story_text)
    }

    pub const fn narration(&self) -> &NarrationService {
        &self.narration
    }
}
