//! Port definitions for speech synthesis
//!
//! Defines the trait (port) that every narration backend implements.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SpeechError;
use crate::types::RenderedSpeech;

/// Identifies a narration backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechBackendId {
    /// Local Piper-compatible synthesizer
    Piper,
    /// Edge read-aloud neural voices
    Edge,
    Murf,
    HuggingFace,
    ElevenLabs,
}

impl SpeechBackendId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Piper => "piper",
            Self::Edge => "edge",
            Self::Murf => "murf",
            Self::HuggingFace => "huggingface",
            Self::ElevenLabs => "elevenlabs",
        }
    }
}

impl fmt::Display for SpeechBackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for Text-to-Speech backends
///
/// Calls block until audio is complete. Implementations must release every
/// resource they acquire (temp files, sockets, runtimes) before returning.
///
/// # Example
///
/// ```ignore
/// use ai_speech::SpeechBackend;
///
/// fn narrate(tts: &dyn SpeechBackend, text: &str) -> Option<String> {
///     tts.synthesize(text, "it", None).ok().map(|s| s.audio_url)
/// }
/// ```
pub trait SpeechBackend: Send + Sync {
    /// Which backend this is
    fn id(&self) -> SpeechBackendId;

    /// Render `text` in `language`, optionally with a specific voice
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the backend fails or produces no audio.
    fn synthesize(
        &self,
        text: &str,
        language: &str,
        voice: Option<&str>,
    ) -> Result<RenderedSpeech, SpeechError>;
}
