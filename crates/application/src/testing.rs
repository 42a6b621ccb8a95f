//! Shared test doubles for the service tests

use ai_core::{CompletionRequest, InferenceError, LlmProvider, TextGenerator};
use ai_speech::{RenderedSpeech, SpeechBackend, SpeechBackendId, SpeechError};
use domain::{ChildProfile, StoryRequest, StoryRequestDraft};
use mockall::mock;
use parking_lot::Mutex;

mock! {
    pub Generator {}

    impl TextGenerator for Generator {
        fn kind(&self) -> LlmProvider;
        fn complete(&self, request: &CompletionRequest) -> Result<String, InferenceError>;
    }
}

/// Generator of the given kind that answers every call with `reply`
pub fn generator_replying(
    kind: LlmProvider,
    reply: impl Fn() -> Result<String, InferenceError> + Send + 'static,
) -> MockGenerator {
    let mut generator = MockGenerator::new();
    generator.expect_kind().return_const(kind);
    generator.expect_complete().returning(move |_| reply());
    generator
}

/// Speech backend that records the voice of every call
#[derive(Debug)]
pub struct FakeSpeech {
    id: SpeechBackendId,
    succeeds: bool,
    calls: Mutex<Vec<Option<String>>>,
}

impl FakeSpeech {
    pub fn working(id: SpeechBackendId) -> Self {
        Self {
            id,
            succeeds: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(id: SpeechBackendId) -> Self {
        Self {
            succeeds: false,
            ..Self::working(id)
        }
    }

    /// Voices passed to each call, in order
    pub fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().clone()
    }
}

impl SpeechBackend for FakeSpeech {
    fn id(&self) -> SpeechBackendId {
        self.id
    }

    fn synthesize(
        &self,
        _text: &str,
        language: &str,
        voice: Option<&str>,
    ) -> Result<RenderedSpeech, SpeechError> {
        self.calls.lock().push(voice.map(ToString::to_string));
        if !self.succeeds {
            return Err(SpeechError::ServiceError {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let tag = voice.map_or_else(|| format!("{}-{language}", self.id), ToString::to_string);
        Ok(RenderedSpeech::new(
            format!("data:audio/mpeg;base64,{}", self.id),
            tag,
        ))
    }
}

/// A valid story in the strict JSON shape
pub fn story_json() -> String {
    serde_json::json!({
        "intro": "Luca trova una lanterna magica.",
        "choice_1_prompt": "Segue la lucciola o il gatto?",
        "choice_1_options": ["Lucciola", "Gatto"],
        "branch_1": "La lucciola Lia lo guida sul ponte.",
        "choice_2_prompt": "Canta o ascolta?",
        "choice_2_options": ["Canta", "Ascolta"],
        "branch_2": "Il gatto Romeo gli insegna una ninna nanna.",
        "resolution": "Luca torna a casa sorridendo.",
        "moral_summary": "La curiosità gentile apre molte porte.",
        "suggested_sequel_hook": "Domani la lanterna brillerà di blu."
    })
    .to_string()
}

/// Validated Italian request for Luca, 6
pub fn sample_request() -> StoryRequest {
    let child = ChildProfile::new("Luca", 6, "curioso").with_interests(["draghi"]);
    StoryRequestDraft::new("genitore@example.com", child)
        .into_request(&["it", "en"])
        .unwrap()
}
