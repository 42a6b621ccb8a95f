//! Narration result

use serde::{Deserialize, Serialize};

/// Outcome of rendering a story to speech
///
/// `audio_url` is either a remote URL or an inline `data:<mime>;base64,...`
/// reference. Both fields are `None` when no backend produced audio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRenderResult {
    pub audio_url: Option<String>,
    pub voice: Option<String>,
}

impl AudioRenderResult {
    /// Audio produced by a backend, tagged with the voice that spoke it
    pub fn rendered(audio_url: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            audio_url: Some(audio_url.into()),
            voice: Some(voice.into()),
        }
    }

    /// No backend produced audio
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether audio is available
    pub fn has_audio(&self) -> bool {
        self.audio_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}
