//! Narration rendering
//!
//! Walks the configured speech backends in a fixed order and keeps the first
//! audio that comes back. A backend that errors is logged and skipped; running
//! out of backends is not an error, the story simply has no audio.
//!
//! Order:
//! 1. local synthesis, when no voice was requested or the voice names it
//! 2. Edge with the requested voice
//! 3. local synthesis without a voice
//! 4. Edge with the language's default voice
//! 5. Murf
//! 6. HuggingFace TTS (only wired when HuggingFace is the active LLM)
//! 7. ElevenLabs

use std::fmt;
use std::sync::Arc;

use ai_speech::{SpeechBackend, SpeechBackendId};
use domain::{AudioRenderResult, Language, StoryPayload, VoiceId};
use tracing::{debug, info, instrument, warn};

/// Speech backends available to the narrator; absent slots are skipped
#[derive(Clone, Default)]
pub struct NarrationBackends {
    pub local: Option<Arc<dyn SpeechBackend>>,
    pub edge: Option<Arc<dyn SpeechBackend>>,
    pub murf: Option<Arc<dyn SpeechBackend>>,
    pub huggingface: Option<Arc<dyn SpeechBackend>>,
    pub elevenlabs: Option<Arc<dyn SpeechBackend>>,
}

impl NarrationBackends {
    /// Identifiers of the wired backends, in chain order
    pub fn enabled(&self) -> Vec<SpeechBackendId> {
        [
            &self.local,
            &self.edge,
            &self.murf,
            &self.huggingface,
            &self.elevenlabs,
        ]
        .into_iter()
        .flatten()
        .map(|backend| backend.id())
        .collect()
    }
}

impl fmt::Debug for NarrationBackends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrationBackends")
            .field("enabled", &self.enabled())
            .finish()
    }
}

/// Service for rendering story narration
#[derive(Debug, Clone)]
pub struct NarrationService {
    backends: NarrationBackends,
}

impl NarrationService {
    pub const fn new(backends: NarrationBackends) -> Self {
        Self { backends }
    }

    pub const fn backends(&self) -> &NarrationBackends {
        &self.backends
    }

    /// Render the narrated parts of a story
    #[instrument(skip(self, story), fields(language = %language, voice = ?voice.map(VoiceId::as_str)))]
    pub fn render(
        &self,
        story: &StoryPayload,
        language: &Language,
        voice: Option<&VoiceId>,
    ) -> AudioRenderResult {
        self.render_text(&story.narration_text(), language.as_str(), voice)
    }

    /// Render arbitrary text through the backend chain
    pub fn render_text(
        &self,
        text: &str,
        language: &str,
        voice: Option<&VoiceId>,
    ) -> AudioRenderResult {
        let local_voice = voice.filter(|v| v.names_backend(SpeechBackendId::Piper.as_str()));

        // A voice naming local synthesis is consumed here, successful or not.
        let local_tried_unvoiced = voice.is_none();
        if voice.is_none() || local_voice.is_some() {
            if let Some(result) = attempt(
                self.backends.local.as_deref(),
                text,
                language,
                local_voice.map(VoiceId::as_str),
            ) {
                return result;
            }
        }

        if let Some(requested) = voice.filter(|_| local_voice.is_none()) {
            if let Some(result) = attempt(
                self.backends.edge.as_deref(),
                text,
                language,
                requested.without_prefix("edge"),
            ) {
                return result;
            }
        }

        // Identical to step 1 when no voice was requested; don't repeat it.
        if !local_tried_unvoiced {
            if let Some(result) =
                attempt(self.backends.local.as_deref(), text, language, None)
            {
                return result;
            }
        }

        let tail = [
            self.backends.edge.as_deref(),
            self.backends.murf.as_deref(),
            self.backends.huggingface.as_deref(),
            self.backends.elevenlabs.as_deref(),
        ];
        for backend in tail {
            if let Some(result) = attempt(backend, text, language, None) {
                return result;
            }
        }

        warn!("No speech backend produced audio; story has no narration");
        AudioRenderResult::none()
    }
}

/// One link of the chain; `None` hands over to the next backend
fn attempt(
    backend: Option<&dyn SpeechBackend>,
    text: &str,
    language: &str,
    voice: Option<&str>,
) -> Option<AudioRenderResult> {
    let backend = backend?;
    debug!(backend = %backend.id(), voice = ?voice, "Trying speech backend");

    match backend.synthesize(text, language, voice) {
        Ok(speech) if !speech.audio_url.is_empty() => {
            info!(backend = %backend.id(), voice = %speech.voice, "Narration rendered");
            Some(AudioRenderResult::rendered(speech.audio_url, speech.voice))
        },
        Ok(_) => {
            warn!(backend = %backend.id(), "Speech backend returned empty audio");
            None
        },
        Err(e) => {
            warn!(backend = %backend.id(), error = %e, "Speech backend failed; trying next");
            None
        },
    }
}
