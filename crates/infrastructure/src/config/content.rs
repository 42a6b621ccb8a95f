//! Content policy configuration

use application::ContentPolicy;
use domain::DEFAULT_ALLOWED_LANGUAGES;
use serde::Deserialize;

/// Banned terms, softening replacements and accepted languages
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentConfig {
    /// Sanitizer policy (`banned_terms`, `replacements`, `placeholder_option`)
    #[serde(flatten)]
    pub policy: ContentPolicy,

    /// Language codes a story request may ask for
    #[serde(default = "default_allowed_languages")]
    pub allowed_languages: Vec<String>,
}

fn default_allowed_languages() -> Vec<String> {
    DEFAULT_ALLOWED_LANGUAGES
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            policy: ContentPolicy::default(),
            allowed_languages: default_allowed_languages(),
        }
    }
}
