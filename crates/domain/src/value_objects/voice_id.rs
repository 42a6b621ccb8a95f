//! Requested narration voice

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a voice identifier, in characters
pub const MAX_VOICE_ID_CHARS: usize = 80;

/// A caller-requested voice identifier (e.g. `it-IT-IsabellaNeural`, `edge:...`, `piper`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    /// Trim and truncate a raw voice identifier; blank input yields `None`
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.chars().take(MAX_VOICE_ID_CHARS).collect()))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier names the given backend, either exactly or as a
    /// `backend:` prefix. Comparison is case-insensitive.
    pub fn names_backend(&self, backend: &str) -> bool {
        let lowered = self.0.to_lowercase();
        lowered.starts_with(&backend.to_lowercase())
    }

    /// Strip an optional `prefix:` token, returning the remaining voice name
    pub fn without_prefix(&self, prefix: &str) -> Option<&str> {
        let candidate = match self.0.split_once(':') {
            Some((head, rest)) if head.trim().eq_ignore_ascii_case(prefix) => rest.trim(),
            _ => self.0.as_str(),
        };
        (!candidate.is_empty()).then_some(candidate)
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_voice_is_absent() {
        assert!(VoiceId::parse("   ").is_none());
    }

    #[test]
    fn long_voice_is_truncated() {
        let raw = "x".repeat(120);
        let voice = VoiceId::parse(&raw).unwrap();
        assert_eq!(voice.as_str().chars().count(), MAX_VOICE_ID_CHARS);
    }

    #[test]
    fn edge_prefix_is_stripped() {
        let voice = VoiceId::parse("edge: it-IT-DiegoNeural").unwrap();
        assert_eq!(voice.without_prefix("edge"), Some("it-IT-DiegoNeural"));
    }

    #[test]
    fn unprefixed_voice_is_returned_as_is() {
        let voice = VoiceId::parse("it-IT-IsabellaNeural").unwrap();
        assert_eq!(voice.without_prefix("edge"), Some("it-IT-IsabellaNeural"));
    }

    #[test]
    fn empty_after_prefix_is_none() {
        let voice = VoiceId::parse("edge:").unwrap();
        assert_eq!(voice.without_prefix("edge"), None);
    }

    #[test]
    fn names_backend_is_case_insensitive() {
        let voice = VoiceId::parse("PIPER:paola").unwrap();
        assert!(voice.names_backend("piper"));
        assert!(!voice.names_backend("edge"));
    }
}
