//! Story summarization for continuity
//!
//! Condenses finished story text into a [`ContinuitySummary`]. Whenever no
//! provider is usable, or its output cannot be read, an extractive summary is
//! built from the text itself.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use ai_core::{
    CompletionRequest, InferenceError, LlmProvider, ProviderRegistry, TextGenerator, extract_json,
};
use domain::{ContinuitySummary, PLACEHOLDER_CHARACTERS};
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;

/// Maximum length of an extractive summary, in characters
pub const EXTRACTIVE_SUMMARY_MAX_CHARS: usize = 260;

/// Maximum number of characters (people) picked by the extractive summary
pub const EXTRACTIVE_MAX_CHARACTERS: usize = 4;

const CLOUD_SUMMARY_SYSTEM: &str = "Sei un assistente editor per storie della buonanotte. \
     Riassumi brevemente e trova personaggi e morali.";

const LOCAL_SUMMARY_INSTRUCTION: &str = "You are a bedtime story editor. Return valid JSON with \
     keys summary, characters (array), moral (string or null), unresolved_threads (array).";

/// Capitalized words of three or more letters, apostrophes allowed
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(r"\b[A-Z][A-Za-zÀ-ÖØ-öø-ÿ']{2,}\b").expect("Failed to compile name pattern")
});

/// Service for summarizing stories
#[derive(Debug, Clone)]
pub struct SummaryService {
    registry: ProviderRegistry,
}

impl SummaryService {
    pub const fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Summarize story text with the active provider
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::GenerationFailed` only when the cloud
    /// provider fails for a reason other than rate limiting.
    #[instrument(skip(self, story_text), fields(
        provider = %self.registry.active_provider(),
        text_len = story_text.len()
    ))]
    pub fn summarize(&self, story_text: &str) -> Result<ContinuitySummary, ApplicationError> {
        let Some(generator) = self.registry.generator() else {
            debug!("Stub providers required; using extractive summary");
            return Ok(extractive_summary(story_text));
        };

        match generator.kind() {
            LlmProvider::OpenAi => summarize_cloud(generator.as_ref(), story_text),
            LlmProvider::Ollama | LlmProvider::HuggingFace => {
                Ok(summarize_local(generator.as_ref(), story_text))
            },
        }
    }
}

fn parse_summary(raw: &str) -> Result<ContinuitySummary, InferenceError> {
    let summary: ContinuitySummary = extract_json(raw)?;
    if summary.summary.trim().is_empty() {
        return Err(InferenceError::InvalidResponse(
            "summary field is empty".to_string(),
        ));
    }
    Ok(summary.with_unique_characters())
}

fn summarize_cloud(
    generator: &dyn TextGenerator,
    story_text: &str,
) -> Result<ContinuitySummary, ApplicationError> {
    let prompt = format!(
        "Analizza il seguente testo e restituisci JSON con summary (<=120 parole), \
         characters (lista), moral (stringa facoltativa), unresolved_threads (lista):\n{story_text}"
    );
    let request = CompletionRequest::summary(CLOUD_SUMMARY_SYSTEM, prompt);

    let raw = match generator.complete(&request) {
        Ok(raw) => raw,
        Err(InferenceError::RateLimited) => {
            warn!("Cloud provider rate limited; using extractive summary");
            return Ok(extractive_summary(story_text));
        },
        Err(e) => {
            warn!(error = %e, "Cloud summary request failed");
            return Err(ApplicationError::summary_failed(e));
        },
    };

    Ok(parse_summary(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "Unreadable cloud summary; using extractive summary");
        extractive_summary(story_text)
    }))
}

fn summarize_local(generator: &dyn TextGenerator, story_text: &str) -> ContinuitySummary {
    let request =
        CompletionRequest::summary("", format!("{LOCAL_SUMMARY_INSTRUCTION}\nSTORY:\n{story_text}"));

    generator
        .complete(&request)
        .and_then(|raw| parse_summary(&raw))
        .unwrap_or_else(|e| {
            warn!(provider = %generator.kind(), error = %e, "Summary failed; using extractive summary");
            extractive_summary(story_text)
        })
}

/// Sentences split after `.`, `!` or `?` followed by whitespace
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?')
            && chars.peek().is_some_and(|(_, next)| next.is_whitespace())
        {
            let end = index + c.len_utf8();
            sentences.push(&text[start..end]);
            while chars.peek().is_some_and(|(_, next)| next.is_whitespace()) {
                chars.next();
            }
            start = chars.peek().map_or(text.len(), |(i, _)| *i);
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Summary built from the text itself, without a model
///
/// Takes the first two sentences capped at
/// [`EXTRACTIVE_SUMMARY_MAX_CHARS`] characters, and up to
/// [`EXTRACTIVE_MAX_CHARACTERS`] distinct capitalized names in sorted order.
/// Empty text yields [`ContinuitySummary::stub`].
pub fn extractive_summary(story_text: &str) -> ContinuitySummary {
    let cleaned = story_text.trim();
    if cleaned.is_empty() {
        return ContinuitySummary::stub();
    }

    let sentences = split_sentences(cleaned);
    let joined = if sentences.is_empty() {
        cleaned.to_string()
    } else {
        sentences
            .iter()
            .take(2)
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    };
    let summary: String = joined.chars().take(EXTRACTIVE_SUMMARY_MAX_CHARS).collect();

    let names: BTreeSet<&str> = NAME_PATTERN
        .find_iter(cleaned)
        .map(|m| m.as_str().trim_matches(['\'', '"']))
        .filter(|name| !name.is_empty())
        .collect();
    let mut characters: Vec<String> = names
        .into_iter()
        .take(EXTRACTIVE_MAX_CHARACTERS)
        .map(ToString::to_string)
        .collect();
    if characters.is_empty() {
        characters = PLACEHOLDER_CHARACTERS.iter().map(ToString::to_string).collect();
    }

    ContinuitySummary {
        summary: summary.trim_end().to_string(),
        characters,
        moral: ContinuitySummary::stub().moral,
        unresolved_threads: Vec::new(),
    }
}
