//! Domain entities - Stories, requests and the memory carried between them

mod audio;
mod continuity;
mod story_payload;
mod story_request;

pub use audio::AudioRenderResult;
pub use continuity::{ChildMemory, ContinuitySummary, MemorySnapshot, PLACEHOLDER_CHARACTERS};
pub use story_payload::{ListField, NarrativeField, OPTIONS_PER_CHOICE, StoryPayload};
pub use story_request::{
    ChildProfile, ControlSettings, DEFAULT_DURATION_MINUTES, DURATION_RANGE_MINUTES,
    MAX_INTEREST_CHARS, StoryRequest, StoryRequestDraft, StyleOptions, normalize_interests,
};
