//! Configuration for text generation providers

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Which LLM backend serves story and summary requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI-compatible chat completions (cloud)
    #[serde(alias = "open_ai")]
    OpenAi,
    /// Ollama server (local or tunnelled)
    Ollama,
    /// HuggingFace hosted inference
    #[default]
    #[serde(alias = "hf", alias = "hugging_face")]
    HuggingFace,
}

impl LlmProvider {
    /// Lowercase provider name used in logs and config
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::HuggingFace => "huggingface",
        }
    }

    /// Whether the provider is the paid cloud backend
    pub const fn is_cloud(self) -> bool {
        matches!(self, Self::OpenAi)
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "huggingface" | "hugging_face" | "hf" => Ok(Self::HuggingFace),
            other => Err(format!("unknown LLM provider: {other}")),
        }
    }
}

/// Provider selection and per-provider settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmConfig {
    /// Active provider
    #[serde(default)]
    pub provider: LlmProvider,

    /// Force stub content regardless of credentials
    #[serde(default)]
    pub offline_mode: bool,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
}

/// OpenAI-compatible chat completions
#[derive(Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API key (sensitive)
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_generation_timeout_ms")]
    pub timeout_ms: u64,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &redacted(self.api_key.as_ref()))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            timeout_ms: default_generation_timeout_ms(),
        }
    }
}

impl OpenAiConfig {
    /// Whether a non-empty API key is configured
    pub fn has_credentials(&self) -> bool {
        has_secret(self.api_key.as_ref())
    }
}

/// Ollama server
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Base URL; blank disables the provider
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    #[serde(default = "default_ollama_model")]
    pub story_model: String,

    #[serde(default = "default_ollama_model")]
    pub summary_model: String,

    #[serde(default = "default_generation_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            story_model: default_ollama_model(),
            summary_model: default_ollama_model(),
            timeout_ms: default_generation_timeout_ms(),
        }
    }
}

impl OllamaConfig {
    /// Whether an endpoint is configured
    pub fn has_endpoint(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}

/// HuggingFace hosted inference
#[derive(Clone, Deserialize)]
pub struct HuggingFaceConfig {
    /// API token (sensitive)
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_hf_base_url")]
    pub base_url: String,

    #[serde(default = "default_hf_text_model")]
    pub story_model: String,

    #[serde(default = "default_hf_text_model")]
    pub summary_model: String,

    /// Text-to-speech model used when HuggingFace is the active provider
    #[serde(default = "default_hf_tts_model")]
    pub tts_model: String,

    #[serde(default = "default_hf_timeout_ms")]
    pub timeout_ms: u64,
}

impl fmt::Debug for HuggingFaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceConfig")
            .field("api_key", &redacted(self.api_key.as_ref()))
            .field("base_url", &self.base_url)
            .field("story_model", &self.story_model)
            .field("summary_model", &self.summary_model)
            .field("tts_model", &self.tts_model)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_hf_base_url(),
            story_model: default_hf_text_model(),
            summary_model: default_hf_text_model(),
            tts_model: default_hf_tts_model(),
            timeout_ms: default_hf_timeout_ms(),
        }
    }
}

impl HuggingFaceConfig {
    /// Whether a non-empty API token is configured
    pub fn has_credentials(&self) -> bool {
        has_secret(self.api_key.as_ref())
    }
}

fn redacted(secret: Option<&SecretString>) -> Option<&'static str> {
    secret.map(|_| "[REDACTED]")
}

fn has_secret(secret: Option<&SecretString>) -> bool {
    secret.is_some_and(|s| !s.expose_secret().trim().is_empty())
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "mistral".to_string()
}

fn default_hf_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_hf_text_model() -> String {
    "microsoft/DialoGPT-large".to_string()
}

fn default_hf_tts_model() -> String {
    "suno/bark-small".to_string()
}

const fn default_generation_timeout_ms() -> u64 {
    60_000
}

const fn default_hf_timeout_ms() -> u64 {
    90_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_is_huggingface() {
        let config = LlmConfig::default();
        assert_eq!(config.provider, LlmProvider::HuggingFace);
        assert!(!config.offline_mode);
    }

    #[test]
    fn default_timeouts() {
        let config = LlmConfig::default();
        assert_eq!(config.openai.timeout_ms, 60_000);
        assert_eq!(config.ollama.timeout_ms, 60_000);
        assert_eq!(config.huggingface.timeout_ms, 90_000);
    }

    #[test]
    fn provider_parses_aliases() {
        assert_eq!("OpenAI".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!("hf".parse::<LlmProvider>().unwrap(), LlmProvider::HuggingFace);
        assert!("gemini".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn config_deserialization_with_defaults() {
        let json = r#"{"provider": "ollama", "ollama": {"base_url": "http://gpu:11434"}}"#;
        let config: LlmConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.provider, LlmProvider::Ollama);
        assert_eq!(config.ollama.base_url, "http://gpu:11434");
        assert_eq!(config.ollama.story_model, "mistral");
        assert_eq!(config.openai.model, "gpt-4.1-mini");
    }

    #[test]
    fn blank_api_key_is_not_a_credential() {
        let config = OpenAiConfig {
            api_key: Some(SecretString::from("  ")),
            ..Default::default()
        };
        assert!(!config.has_credentials());
    }

    #[test]
    fn debug_redacts_api_keys() {
        let config = HuggingFaceConfig {
            api_key: Some(SecretString::from("hf_secret_token")),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hf_secret_token"));
    }

    #[test]
    fn blank_ollama_url_has_no_endpoint() {
        let config = OllamaConfig {
            base_url: " ".to_string(),
            ..Default::default()
        };
        assert!(!config.has_endpoint());
    }
}
