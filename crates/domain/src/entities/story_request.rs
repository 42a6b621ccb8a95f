//! Story request - what a parent asks the storyteller for
//!
//! Requests arrive as a [`StoryRequestDraft`] (the loosely-typed inbound shape)
//! and become a [`StoryRequest`] only after normalization and validation. The
//! orchestration layer accepts nothing but the validated form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::DomainError;
use crate::value_objects::{ChildAlias, Language, VoiceId};

/// Maximum length of a single interest entry, in characters
pub const MAX_INTEREST_CHARS: usize = 60;

/// Shortest and longest story a request may ask for, in minutes
pub const DURATION_RANGE_MINUTES: std::ops::RangeInclusive<u8> = 5..=10;

/// Narration length used when a request does not ask for one
pub const DEFAULT_DURATION_MINUTES: u8 = 7;

/// Trim, cap and case-insensitively deduplicate a list of interests
///
/// The first spelling seen wins. Applying this twice yields the same list.
///
/// # Examples
///
/// ```
/// use domain::normalize_interests;
///
/// let raw = vec!["Draghi".to_string(), "draghi ".to_string(), "Calcio".to_string()];
/// assert_eq!(normalize_interests(&raw), vec!["Draghi", "Calcio"]);
/// ```
pub fn normalize_interests(items: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut cleaned = Vec::with_capacity(items.len());

    for item in items {
        let capped: String = item.trim().chars().take(MAX_INTEREST_CHARS).collect();
        // Capping can expose trailing whitespace that was interior before.
        let normalized = capped.trim_end();
        if normalized.is_empty() {
            continue;
        }
        if seen.insert(normalized.to_lowercase()) {
            cleaned.push(normalized.to_string());
        }
    }

    cleaned
}

/// The child the story is for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ChildProfile {
    /// First name or nickname
    #[validate(length(min = 1, max = 40))]
    pub name: String,
    /// Age in years
    #[validate(range(min = 2, max = 12))]
    pub age: u8,
    /// How the child feels tonight
    #[validate(length(min = 1, max = 60))]
    pub mood: String,
    /// Topics the child likes
    #[serde(default)]
    pub interests: Vec<String>,
}

impl ChildProfile {
    /// Create a profile without interests
    pub fn new(name: impl Into<String>, age: u8, mood: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            mood: mood.into(),
            interests: Vec::new(),
        }
    }

    /// Set the interests list
    #[must_use]
    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            age: self.age,
            mood: self.mood.trim().to_string(),
            interests: normalize_interests(&self.interests),
        }
    }
}

/// Safety and tone switches chosen by the parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSettings {
    /// Avoid scary elements and soften banned terms in the output
    #[serde(default = "default_true")]
    pub no_scary: bool,
    /// Weave in a lesson about kindness
    #[serde(default = "default_true")]
    pub kindness_lesson: bool,
    /// Draw on local folklore (Pinocchio, regional fairy tales)
    #[serde(default = "default_true", alias = "italian_focus")]
    pub locale_focus: bool,
    /// Add light educational curiosities
    #[serde(default)]
    pub educational: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            no_scary: true,
            kindness_lesson: true,
            locale_focus: true,
            educational: false,
        }
    }
}

/// Optional free-text style hints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StyleOptions {
    /// Narrative style, e.g. "fiaba classica", "avventura"
    #[serde(default)]
    #[validate(length(max = 40))]
    pub style: Option<String>,
    /// Emotional tone, e.g. "calmo", "gioioso"
    #[serde(default)]
    #[validate(length(max = 30))]
    pub tone: Option<String>,
    /// Topic to weave in lightly, e.g. "sistema solare"
    #[serde(default)]
    #[validate(length(max = 60))]
    pub educational_topic: Option<String>,
    /// Ask the model for illustration panel prompts
    #[serde(default)]
    pub generate_panels: bool,
}

impl StyleOptions {
    fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            style: clean(self.style),
            tone: clean(self.tone),
            educational_topic: clean(self.educational_topic),
            generate_panels: self.generate_panels,
        }
    }
}

/// Unvalidated story request as received from the request-handling layer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoryRequestDraft {
    /// Parent account email
    #[validate(length(min = 3, max = 120))]
    pub parent_email: String,
    /// Child profile
    #[validate(nested)]
    pub child: ChildProfile,
    /// Safety controls
    #[serde(default)]
    pub controls: ControlSettings,
    /// Style hints
    #[serde(default)]
    #[validate(nested)]
    pub style: StyleOptions,
    /// Requested language code (any case, may carry whitespace)
    #[serde(default = "default_language")]
    pub language: String,
    /// Target narration length
    #[serde(default = "default_duration")]
    #[validate(range(min = 5, max = 10))]
    pub target_duration_minutes: u8,
    /// Continue the previous story for this child
    #[serde(default)]
    pub sequel: bool,
    /// Story being continued, when known
    #[serde(default)]
    pub previous_story_id: Option<String>,
    /// Requested narration voice
    #[serde(default)]
    pub voice: Option<String>,
}

fn default_language() -> String {
    "it".to_string()
}

const fn default_duration() -> u8 {
    DEFAULT_DURATION_MINUTES
}

impl StoryRequestDraft {
    /// Create a draft with default controls, Italian, 7 minutes
    pub fn new(parent_email: impl Into<String>, child: ChildProfile) -> Self {
        Self {
            parent_email: parent_email.into(),
            child,
            controls: ControlSettings::default(),
            style: StyleOptions::default(),
            language: default_language(),
            target_duration_minutes: DEFAULT_DURATION_MINUTES,
            sequel: false,
            previous_story_id: None,
            voice: None,
        }
    }

    /// Normalize and validate into a [`StoryRequest`]
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` when a field is out of bounds and
    /// `DomainError::UnsupportedLanguage` when the language is not allowed.
    pub fn into_request<S: AsRef<str>>(
        self,
        allowed_languages: &[S],
    ) -> Result<StoryRequest, DomainError> {
        let draft = Self {
            parent_email: self.parent_email.trim().to_string(),
            child: self.child.normalized(),
            style: self.style.normalized(),
            ..self
        };

        draft
            .validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let language = Language::parse(&draft.language, allowed_languages)?;
        let voice = draft.voice.as_deref().and_then(VoiceId::parse);

        Ok(StoryRequest {
            parent_email: draft.parent_email,
            child: draft.child,
            controls: draft.controls,
            style: draft.style,
            language,
            target_duration_minutes: draft.target_duration_minutes,
            sequel: draft.sequel,
            previous_story_id: draft.previous_story_id,
            voice,
        })
    }
}

/// A normalized, validated story request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryRequest {
    pub parent_email: String,
    pub child: ChildProfile,
    pub controls: ControlSettings,
    pub style: StyleOptions,
    pub language: Language,
    pub target_duration_minutes: u8,
    pub sequel: bool,
    pub previous_story_id: Option<String>,
    pub voice: Option<VoiceId>,
}

impl StoryRequest {
    /// Key under which this child's continuity is stored
    pub fn child_alias(&self) -> ChildAlias {
        ChildAlias::for_child(&self.parent_email, &self.child.name)
    }
}
