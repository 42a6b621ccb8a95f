//! Story language value object
//!
//! A language is a lowercase code that has been checked against the
//! configured allow-list. Construction is the only place normalization happens,
//! so everything downstream can compare codes directly.
//!
//! # Examples
//!
//! ```
//! use domain::Language;
//!
//! let allowed = ["it", "en"];
//! let lang = Language::parse("IT ", &allowed).unwrap();
//! assert_eq!(lang.as_str(), "it");
//!
//! assert!(Language::parse("de", &allowed).is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Language codes accepted when no allow-list is configured
pub const DEFAULT_ALLOWED_LANGUAGES: &[&str] = &["ar", "en", "es", "fr", "it"];

/// A validated, lowercase story language code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    /// Normalize `raw` and check it against `allowed`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnsupportedLanguage` if the normalized code is not
    /// in the allow-list.
    pub fn parse<S: AsRef<str>>(raw: &str, allowed: &[S]) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        if allowed.iter().any(|code| code.as_ref() == normalized) {
            Ok(Self(normalized))
        } else {
            Err(DomainError::UnsupportedLanguage(normalized))
        }
    }

    /// Italian, the product's home language
    pub fn italian() -> Self {
        Self("it".to_string())
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name of the language, in Italian, for prompt text
    pub fn display_name(&self) -> &str {
        match self.0.as_str() {
            "it" => "italiano",
            "en" => "inglese",
            "es" => "spagnolo",
            "fr" => "francese",
            "ar" => "arabo",
            other => other,
        }
    }

    /// Whether this is Italian
    pub fn is_italian(&self) -> bool {
        self.0 == "it"
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::italian()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_is_trimmed_and_lowercased() {
        let lang = Language::parse("IT ", DEFAULT_ALLOWED_LANGUAGES).unwrap();
        assert_eq!(lang.as_str(), "it");
    }

    #[test]
    fn unsupported_language_is_rejected() {
        let err = Language::parse("de", DEFAULT_ALLOWED_LANGUAGES).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedLanguage(code) if code == "de"));
    }

    #[test]
    fn allow_list_can_be_owned_strings() {
        let allowed = vec!["en".to_string()];
        assert!(Language::parse("EN", &allowed).is_ok());
        assert!(Language::parse("it", &allowed).is_err());
    }

    #[test]
    fn display_names() {
        let lang = Language::parse("fr", DEFAULT_ALLOWED_LANGUAGES).unwrap();
        assert_eq!(lang.display_name(), "francese");
        assert_eq!(Language::italian().display_name(), "italiano");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Language::italian()).unwrap();
        assert_eq!(json, "\"it\"");
    }
}
