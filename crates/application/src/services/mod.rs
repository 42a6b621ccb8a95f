//! Application services - Use case implementations

mod content_sanitizer;
mod narration_service;
pub mod prompt_builder;
mod story_pipeline;
mod story_service;
mod summary_service;

pub use content_sanitizer::{ContentPolicy, ContentSanitizer, SafetyReport};
pub use narration_service::{NarrationBackends, NarrationService};
pub use prompt_builder::build_story_prompt;
pub use story_pipeline::{StoryPipeline, StoryResponse};
pub use story_service::{GeneratedStory, StoryOutcome, StoryService};
pub use summary_service::{
    EXTRACTIVE_MAX_CHARACTERS, EXTRACTIVE_SUMMARY_MAX_CHARS, SummaryService, extractive_summary,
};
