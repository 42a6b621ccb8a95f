//! Provider registry
//!
//! Resolves the active LLM provider once per process and owns the single
//! pooled client built for it. Inactive providers never get a client.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{LlmConfig, LlmProvider};
use crate::error::InferenceError;
use crate::huggingface::HuggingFaceGenerator;
use crate::ollama::OllamaGenerator;
use crate::openai::OpenAiGenerator;
use crate::ports::TextGenerator;

/// Read-only view of the configured text generation provider
#[derive(Clone)]
pub struct ProviderRegistry {
    provider: LlmProvider,
    stubs_required: bool,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("provider", &self.provider)
            .field("stubs_required", &self.stubs_required)
            .field("has_generator", &self.generator.is_some())
            .finish()
    }
}

impl ProviderRegistry {
    /// Resolve the active provider and build its client
    ///
    /// # Errors
    ///
    /// Returns an error only when the active provider is fully configured but
    /// its HTTP client cannot be constructed.
    pub fn new(config: &LlmConfig) -> Result<Self, InferenceError> {
        let provider = config.provider;
        let stubs_required = stub_providers_required(config);

        if stubs_required {
            warn!(
                provider = %provider,
                offline_mode = config.offline_mode,
                "LLM provider unavailable; stub content will be served"
            );
            return Ok(Self {
                provider,
                stubs_required,
                generator: None,
            });
        }

        let generator: Arc<dyn TextGenerator> = match provider {
            LlmProvider::OpenAi => Arc::new(OpenAiGenerator::new(&config.openai)?),
            LlmProvider::Ollama => Arc::new(OllamaGenerator::new(&config.ollama)?),
            LlmProvider::HuggingFace => Arc::new(HuggingFaceGenerator::new(&config.huggingface)?),
        };

        info!(provider = %provider, "LLM provider ready");

        Ok(Self {
            provider,
            stubs_required,
            generator: Some(generator),
        })
    }

    /// Registry around an existing generator
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            provider: generator.kind(),
            stubs_required: false,
            generator: Some(generator),
        }
    }

    /// Registry that always serves stubs
    pub const fn offline(provider: LlmProvider) -> Self {
        Self {
            provider,
            stubs_required: true,
            generator: None,
        }
    }

    /// The configured provider, whether or not it is usable
    pub const fn active_provider(&self) -> LlmProvider {
        self.provider
    }

    /// Whether callers must fall back to deterministic content
    pub const fn stub_providers_required(&self) -> bool {
        self.stubs_required
    }

    /// Client for the active provider, absent when stubs are required
    pub fn generator(&self) -> Option<Arc<dyn TextGenerator>> {
        if self.stubs_required {
            return None;
        }
        self.generator.clone()
    }
}

/// Whether the configuration forces stub content
///
/// True in offline mode or when the active provider lacks its credential or
/// endpoint. Ollama needs no credential, only a base URL.
pub fn stub_providers_required(config: &LlmConfig) -> bool {
    if config.offline_mode {
        return true;
    }
    match config.provider {
        LlmProvider::OpenAi => !config.openai.has_credentials(),
        LlmProvider::Ollama => !config.ollama.has_endpoint(),
        LlmProvider::HuggingFace => !config.huggingface.has_credentials(),
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::ports::MockTextGenerator;

    #[test]
    fn offline_mode_forces_stubs() {
        let config = LlmConfig {
            provider: LlmProvider::Ollama,
            offline_mode: true,
            ..Default::default()
        };
        let registry = ProviderRegistry::new(&config).unwrap();
        assert!(registry.stub_providers_required());
        assert!(registry.generator().is_none());
        assert_eq!(registry.active_provider(), LlmProvider::Ollama);
    }

    #[test]
    fn missing_openai_key_forces_stubs() {
        let config = LlmConfig {
            provider: LlmProvider::OpenAi,
            ..Default::default()
        };
        assert!(stub_providers_required(&config));
    }

    #[test]
    fn default_huggingface_without_key_forces_stubs() {
        assert!(stub_providers_required(&LlmConfig::default()));
    }

    #[test]
    fn ollama_needs_no_credential() {
        let config = LlmConfig {
            provider: LlmProvider::Ollama,
            ..Default::default()
        };
        assert!(!stub_providers_required(&config));
        let registry = ProviderRegistry::new(&config).unwrap();
        assert_eq!(registry.generator().unwrap().kind(), LlmProvider::Ollama);
    }

    #[test]
    fn only_active_provider_gets_a_client() {
        let mut config = LlmConfig {
            provider: LlmProvider::HuggingFace,
            ..Default::default()
        };
        config.openai.api_key = Some(SecretString::from("sk-test"));
        config.huggingface.api_key = Some(SecretString::from("hf-test"));

        let registry = ProviderRegistry::new(&config).unwrap();
        assert_eq!(
            registry.generator().unwrap().kind(),
            LlmProvider::HuggingFace
        );
    }

    #[test]
    fn with_generator_takes_provider_from_generator() {
        let mut mock = MockTextGenerator::new();
        mock.expect_kind().return_const(LlmProvider::OpenAi);

        let registry = ProviderRegistry::with_generator(Arc::new(mock));
        assert_eq!(registry.active_provider(), LlmProvider::OpenAi);
        assert!(!registry.stub_providers_required());
    }

    #[test]
    fn offline_registry_has_no_generator() {
        let registry = ProviderRegistry::offline(LlmProvider::OpenAi);
        assert!(registry.generator().is_none());
    }
}
