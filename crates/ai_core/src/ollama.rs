//! Ollama `/api/generate` client

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::{LlmProvider, OllamaConfig};
use crate::error::InferenceError;
use crate::ports::{CompletionPurpose, CompletionRequest, TextGenerator};

const CLIENT_USER_AGENT: &str = "StoriaAI/1.0";

/// Local (or tunnelled) text generator backed by an Ollama server
#[derive(Debug)]
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    story_model: String,
    summary_model: String,
}

impl OllamaGenerator {
    /// Build the generator and its pooled client
    pub fn new(config: &OllamaConfig) -> Result<Self, InferenceError> {
        if !config.has_endpoint() {
            return Err(InferenceError::Configuration(
                "Ollama base URL missing".to_string(),
            ));
        }

        // Tunnels such as ngrok interpose an HTML warning page without this header.
        let mut headers = HeaderMap::new();
        headers.insert(
            "ngrok-skip-browser-warning",
            HeaderValue::from_static("true"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            story_model = %config.story_model,
            "Initialized Ollama text generator"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            story_model: config.story_model.clone(),
            summary_model: config.summary_model.clone(),
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn model_for(&self, purpose: CompletionPurpose) -> &str {
        match purpose {
            CompletionPurpose::Story => &self.story_model,
            CompletionPurpose::Summary => &self.summary_model,
        }
    }
}

/// Ollama does not take a separate system message on `/api/generate`; the
/// instruction is prepended to the prompt.
fn compose_prompt(request: &CompletionRequest) -> String {
    if request.system.is_empty() {
        request.prompt.clone()
    } else {
        format!("{}\nPROMPT:\n{}", request.system, request.prompt)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl TextGenerator for OllamaGenerator {
    fn kind(&self) -> LlmProvider {
        LlmProvider::Ollama
    }

    #[instrument(skip(self, request), fields(model = %self.model_for(request.purpose)))]
    fn complete(&self, request: &CompletionRequest) -> Result<String, InferenceError> {
        let body = GenerateRequest {
            model: self.model_for(request.purpose),
            prompt: compose_prompt(request),
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
            },
        };

        debug!("Sending generate request to Ollama");

        let response = self.client.post(self.api_url("generate")).json(&body).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            warn!(status = %status, "Ollama generate request failed");
            return Err(InferenceError::from_status(status, body));
        }

        let parsed: GenerateResponse = response.json()?;
        if parsed.response.trim().is_empty() {
            return Err(InferenceError::InvalidResponse(
                "empty response from Ollama".to_string(),
            ));
        }

        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_system_instruction() {
        let request = CompletionRequest::story("Be kind.", "Tell a story.");
        assert_eq!(compose_prompt(&request), "Be kind.\nPROMPT:\nTell a story.");
    }

    #[test]
    fn empty_system_leaves_prompt_alone() {
        let request = CompletionRequest::summary("", "STORY: ...");
        assert_eq!(compose_prompt(&request), "STORY: ...");
    }

    #[test]
    fn blank_base_url_is_rejected() {
        let config = OllamaConfig {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(OllamaGenerator::new(&config).is_err());
    }

    #[test]
    fn urls_and_models() {
        let config = OllamaConfig {
            base_url: "http://gpu:11434/".to_string(),
            summary_model: "llama3".to_string(),
            ..Default::default()
        };
        let generator = OllamaGenerator::new(&config).unwrap();
        assert_eq!(generator.api_url("/generate"), "http://gpu:11434/api/generate");
        assert_eq!(generator.model_for(CompletionPurpose::Story), "mistral");
        assert_eq!(generator.model_for(CompletionPurpose::Summary), "llama3");
    }
}
