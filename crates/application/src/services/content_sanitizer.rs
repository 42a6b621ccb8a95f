//! Content sanitizer for generated stories
//!
//! Screens story text against a configurable list of banned terms using the
//! Aho-Corasick algorithm. Narrative text is softened in place through a
//! replacement table; a flagged choice option or panel prompt is swapped for
//! a neutral placeholder so list lengths survive.
//!
//! Sanitizing is a fixed point: running it over its own output changes
//! nothing, and an untouched story comes back borrowed.

use std::borrow::Cow;
use std::collections::BTreeMap;

use aho_corasick::{AhoCorasick, MatchKind};
use domain::{ControlSettings, ListField, NarrativeField, StoryPayload};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApplicationError;

/// Terms, replacements and placeholder used by the sanitizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPolicy {
    /// Case-insensitive substrings that mark content as unsuitable
    #[serde(default = "default_banned_terms")]
    pub banned_terms: Vec<String>,

    /// Softening replacements applied inside flagged text fields
    #[serde(default = "default_replacements")]
    pub replacements: BTreeMap<String, String>,

    /// Text substituted for a flagged choice option or panel prompt
    #[serde(default = "default_placeholder_option")]
    pub placeholder_option: String,
}

impl Default for ContentPolicy {
    fn default() -> Self {
        Self {
            banned_terms: default_banned_terms(),
            replacements: default_replacements(),
            placeholder_option: default_placeholder_option(),
        }
    }
}

fn default_banned_terms() -> Vec<String> {
    [
        "morte", "sangue", "paura", "mostro", "arma", "violenza", "dead", "blood", "muerte",
        "sangre", "miedo", "mort", "sang", "peur", "موت", "دم", "خوف",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_replacements() -> BTreeMap<String, String> {
    [
        ("paura", "serenità"),
        ("morte", "riposo"),
        ("fear", "serenity"),
        ("death", "rest"),
        ("miedo", "calma"),
        ("peur", "calme"),
    ]
    .iter()
    .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
    .collect()
}

fn default_placeholder_option() -> String {
    "Un'opzione tranquilla".to_string()
}

/// Result of screening free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub safe: bool,
    /// Banned terms found, in policy order
    pub issues: Vec<String>,
}

/// Story sanitizer built from a [`ContentPolicy`]
#[derive(Debug, Clone)]
pub struct ContentSanitizer {
    banned_terms: Vec<String>,
    detector: AhoCorasick,
    replacer: AhoCorasick,
    replacement_values: Vec<String>,
    placeholder: String,
}

impl ContentSanitizer {
    /// Compile the policy into matchers
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the term lists cannot be
    /// compiled.
    pub fn new(policy: &ContentPolicy) -> Result<Self, ApplicationError> {
        let banned_terms: Vec<String> = policy
            .banned_terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let detector = AhoCorasick::new(&banned_terms)
            .map_err(|e| ApplicationError::Configuration(format!("banned terms: {e}")))?;

        let (keys, replacement_values): (Vec<&str>, Vec<String>) = policy
            .replacements
            .iter()
            .filter(|(from, _)| !from.is_empty())
            .map(|(from, to)| (from.as_str(), to.clone()))
            .unzip();

        let replacer = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&keys)
            .map_err(|e| ApplicationError::Configuration(format!("replacements: {e}")))?;

        Ok(Self {
            banned_terms,
            detector,
            replacer,
            replacement_values,
            placeholder: policy.placeholder_option.clone(),
        })
    }

    fn contains_banned(&self, text: &str) -> bool {
        self.detector.is_match(&text.to_lowercase())
    }

    /// Screen a story according to the request's controls
    ///
    /// Only active when `no_scary` is set. Returns the input borrowed when no
    /// field needed changing.
    pub fn sanitize<'a>(
        &self,
        story: &'a StoryPayload,
        controls: &ControlSettings,
    ) -> Cow<'a, StoryPayload> {
        let mut result = Cow::Borrowed(story);
        if !controls.no_scary {
            return result;
        }

        for field in NarrativeField::ALL {
            let Some(text) = story.text(field) else {
                continue;
            };
            if !self.contains_banned(text) {
                continue;
            }
            let softened = self
                .replacer
                .replace_all(text, &self.replacement_values);
            if softened != text {
                debug!(field = field.name(), "Softened banned terms");
                if let Some(slot) = result.to_mut().text_mut(field) {
                    *slot = softened;
                }
            }
        }

        for field in ListField::ALL {
            for (index, entry) in story.list(field).iter().enumerate() {
                if *entry == self.placeholder || !self.contains_banned(entry) {
                    continue;
                }
                debug!(field = field.name(), index, "Replaced flagged entry");
                if let Some(slot) = result.to_mut().list_mut(field).get_mut(index) {
                    slot.clone_from(&self.placeholder);
                }
            }
        }

        result
    }

    /// List every banned term present in free text
    pub fn validate_text(&self, text: &str) -> SafetyReport {
        let lowered = text.to_lowercase();
        let mut hits = vec![false; self.banned_terms.len()];
        for m in self.detector.find_overlapping_iter(&lowered) {
            if let Some(hit) = hits.get_mut(m.pattern().as_usize()) {
                *hit = true;
            }
        }

        let issues: Vec<String> = self
            .banned_terms
            .iter()
            .zip(hits)
            .filter_map(|(term, hit)| hit.then(|| term.clone()))
            .collect();

        SafetyReport {
            safe: issues.is_empty(),
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> ContentSanitizer {
        ContentSanitizer::new(&ContentPolicy::default()).unwrap()
    }

    fn controls(no_scary: bool) -> ControlSettings {
        ControlSettings {
            no_scary,
            ..Default::default()
        }
    }

    #[test]
    fn clean_story_is_borrowed() {
        let story = StoryPayload::stub();
        let result = sanitizer().sanitize(&story, &controls(true));
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn flagged_text_is_softened() {
        let mut story = StoryPayload::stub();
        story.intro = "Il lupo non fa paura, nessuna morte nel bosco.".to_string();

        let result = sanitizer().sanitize(&story, &controls(true));
        assert_eq!(
            result.intro,
            "Il lupo non fa serenità, nessuna riposo nel bosco."
        );
        assert_eq!(result.branch_1, story.branch_1);
    }

    #[test]
    fn replacement_is_case_insensitive() {
        let mut story = StoryPayload::stub();
        story.resolution = "Paura addio.".to_string();
        let result = sanitizer().sanitize(&story, &controls(true));
        assert_eq!(result.resolution, "serenità addio.");
    }

    #[test]
    fn flagged_option_is_replaced_and_count_preserved() {
        let mut story = StoryPayload::stub();
        story.choice_2_options = vec!["Il mostro".to_string(), "Sogno".to_string()];

        let result = sanitizer().sanitize(&story, &controls(true));
        assert_eq!(
            result.choice_2_options,
            vec!["Un'opzione tranquilla".to_string(), "Sogno".to_string()]
        );
        assert_eq!(result.choice_1_options, story.choice_1_options);
    }

    #[test]
    fn flagged_panel_prompt_is_replaced() {
        let mut story = StoryPayload::stub();
        story.panel_prompts = vec!["Un mostro pieno di sangue".to_string(), "Luna".to_string()];

        let result = sanitizer().sanitize(&story, &controls(true));
        assert!(matches!(result, Cow::Owned(_)));
        assert_eq!(
            result.panel_prompts,
            vec!["Un'opzione tranquilla".to_string(), "Luna".to_string()]
        );
    }

    #[test]
    fn panel_prompts_kept_when_scary_allowed() {
        let mut story = StoryPayload::stub();
        story.panel_prompts = vec!["Un mostro pieno di sangue".to_string()];

        let result = sanitizer().sanitize(&story, &controls(false));
        assert_eq!(result.panel_prompts, story.panel_prompts);
    }

    #[test]
    fn disabled_control_leaves_story_untouched() {
        let mut story = StoryPayload::stub();
        story.intro = "Una storia di paura".to_string();
        story.choice_1_options = vec!["Arma".to_string(), "Fata".to_string()];

        let result = sanitizer().sanitize(&story, &controls(false));
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn flagged_text_without_replacement_stays_borrowed() {
        let mut story = StoryPayload::stub();
        story.branch_2 = "Una goccia di sangue di drago.".to_string();

        let result = sanitizer().sanitize(&story, &controls(true));
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn sanitizing_is_a_fixed_point() {
        let mut story = StoryPayload::stub();
        story.intro = "La paura della morte".to_string();
        story.choice_1_options = vec!["Violenza".to_string(), "Blood moon".to_string()];
        story.suggested_sequel_hook = Some("Niente paura!".to_string());
        story.panel_prompts = vec!["Arma lucente".to_string(), "Luna".to_string()];

        let s = sanitizer();
        let once = s.sanitize(&story, &controls(true)).into_owned();
        let twice = s.sanitize(&once, &controls(true));
        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(*twice, once);
    }

    #[test]
    fn validate_text_lists_issues_in_policy_order() {
        let report = sanitizer().validate_text("Blood and PAURA, then more paura");
        assert!(!report.safe);
        assert_eq!(report.issues, vec!["paura".to_string(), "blood".to_string()]);
    }

    #[test]
    fn validate_text_reports_overlapping_terms() {
        let report = sanitizer().validate_text("la morte");
        assert_eq!(report.issues, vec!["morte".to_string(), "mort".to_string()]);
    }

    #[test]
    fn clean_text_is_safe() {
        let report = sanitizer().validate_text("Una notte di stelle e lucciole.");
        assert!(report.safe);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn non_latin_terms_are_detected() {
        let report = sanitizer().validate_text("قصة بلا خوف");
        assert_eq!(report.issues, vec!["خوف".to_string()]);
    }

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: ContentPolicy =
            serde_json::from_str(r#"{"placeholder_option": "Una scelta serena"}"#).unwrap();
        assert_eq!(policy.placeholder_option, "Una scelta serena");
        assert!(policy.banned_terms.contains(&"mostro".to_string()));
        assert_eq!(policy.replacements.get("morte").map(String::as_str), Some("riposo"));
    }
}
