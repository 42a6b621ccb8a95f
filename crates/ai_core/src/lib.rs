//! AI Core - Text generation providers
//!
//! Provides the LLM port used by the story and summary orchestrators, blocking
//! clients for OpenAI, Ollama and HuggingFace, and the registry that picks the
//! active one from configuration.

pub mod config;
pub mod error;
pub mod huggingface;
pub mod json;
pub mod ollama;
pub mod openai;
pub mod ports;
pub mod registry;

pub use config::{HuggingFaceConfig, LlmConfig, LlmProvider, OllamaConfig, OpenAiConfig};
pub use error::InferenceError;
pub use huggingface::HuggingFaceGenerator;
pub use json::{extract_json, parse_json};
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;
pub use ports::{CompletionPurpose, CompletionRequest, TextGenerator};
pub use registry::{ProviderRegistry, stub_providers_required};
