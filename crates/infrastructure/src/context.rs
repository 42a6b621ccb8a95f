//! Application wiring
//!
//! Builds the provider registry, narration backends and story pipeline from
//! one `AppConfig` snapshot. Every client is constructed here, once.

use std::sync::Arc;

use ai_core::{HuggingFaceConfig, LlmConfig, LlmProvider, ProviderRegistry};
use ai_speech::{
    EdgeTtsBackend, ElevenLabsBackend, HuggingFaceTtsBackend, HuggingFaceTtsConfig, MurfBackend,
    PiperBackend, SpeechBackend, SpeechConfig, SpeechError,
};
use application::{
    ContentSanitizer, ContinuityStore, NarrationBackends, NarrationService, StoryPipeline,
    StoryService, SummaryService,
};
use domain::{DomainError, StoryRequest, StoryRequestDraft};
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::error::InfrastructureError;
use crate::persistence::InMemoryContinuityStore;

/// Fully wired application
pub struct AppContext {
    config: Arc<AppConfig>,
    registry: ProviderRegistry,
    pipeline: StoryPipeline,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("registry", &self.registry)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Wire everything with a fresh in-memory continuity store
    ///
    /// # Errors
    ///
    /// Returns an error when the content policy is invalid or a configured
    /// client cannot be constructed.
    pub fn build(config: Arc<AppConfig>) -> Result<Self, InfrastructureError> {
        Self::with_store(config, Arc::new(InMemoryContinuityStore::new()))
    }

    /// Wire everything around an existing continuity store
    ///
    /// # Errors
    ///
    /// Same as [`AppContext::build`].
    #[instrument(skip_all, fields(provider = %config.llm.provider))]
    pub fn with_store(
        config: Arc<AppConfig>,
        store: Arc<dyn ContinuityStore>,
    ) -> Result<Self, InfrastructureError> {
        let registry = ProviderRegistry::new(&config.llm)?;
        let sanitizer = Arc::new(ContentSanitizer::new(&config.content.policy)?);
        let backends = narration_backends(&config.llm, &config.speech)?;

        info!(
            stubs = registry.stub_providers_required(),
            speech = ?backends.enabled(),
            "Application wired"
        );

        let pipeline = StoryPipeline::new(
            StoryService::new(registry.clone(), Arc::clone(&sanitizer)),
            NarrationService::new(backends),
            SummaryService::new(registry.clone()),
            sanitizer,
            store,
        );

        Ok(Self {
            config,
            registry,
            pipeline,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub const fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub const fn pipeline(&self) -> &StoryPipeline {
        &self.pipeline
    }

    /// Validate a draft against the configured languages
    ///
    /// # Errors
    ///
    /// Returns the domain validation error for out-of-range fields or an
    /// unsupported language.
    pub fn validate_request(&self, draft: StoryRequestDraft) -> Result<StoryRequest, DomainError> {
        draft.into_request(&self.config.content.allowed_languages)
    }
}

/// Build the narration backends enabled by configuration
///
/// HuggingFace TTS is only wired when HuggingFace is the active text provider
/// and has a token; it shares that provider's credentials.
///
/// # Errors
///
/// Returns an error when a configured backend cannot build its HTTP client.
pub fn narration_backends(
    llm: &LlmConfig,
    speech: &SpeechConfig,
) -> Result<NarrationBackends, SpeechError> {
    let local = speech
        .local
        .enabled
        .then(|| shared(PiperBackend::new(speech.local.clone())));
    let edge = speech
        .edge
        .enabled
        .then(|| shared(EdgeTtsBackend::new(speech.edge.clone())));

    let murf = if speech.murf.is_configured() {
        Some(shared(MurfBackend::new(&speech.murf)?))
    } else {
        None
    };

    let huggingface = match huggingface_tts_config(llm) {
        Some(config) => Some(shared(HuggingFaceTtsBackend::new(&config)?)),
        None => None,
    };

    let elevenlabs = if speech.elevenlabs.is_configured() {
        Some(shared(ElevenLabsBackend::new(&speech.elevenlabs)?))
    } else {
        None
    };

    Ok(NarrationBackends {
        local,
        edge,
        murf,
        huggingface,
        elevenlabs,
    })
}

/// HuggingFace TTS settings derived from the text provider settings
pub fn huggingface_tts_config(llm: &LlmConfig) -> Option<HuggingFaceTtsConfig> {
    if llm.provider != LlmProvider::HuggingFace || !llm.huggingface.has_credentials() {
        return None;
    }
    let HuggingFaceConfig {
        api_key,
        base_url,
        tts_model,
        timeout_ms,
        ..
    } = &llm.huggingface;
    Some(HuggingFaceTtsConfig {
        api_key: api_key.clone()?,
        base_url: base_url.clone(),
        model: tts_model.clone(),
        timeout_ms: *timeout_ms,
    })
}

fn shared<B: SpeechBackend + 'static>(backend: B) -> Arc<dyn SpeechBackend> {
    Arc::new(backend)
}
