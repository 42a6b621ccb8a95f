//! OpenAI-compatible chat completions client

use std::time::Duration;

use reqwest::blocking::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::{LlmProvider, OpenAiConfig};
use crate::error::InferenceError;
use crate::ports::{CompletionRequest, TextGenerator};

/// Cloud text generator backed by `/chat/completions`
#[derive(Debug)]
pub struct OpenAiGenerator {
    client: Client,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    /// Build the generator and its pooled client
    ///
    /// The bearer token is installed as a default header so that individual
    /// requests never touch the secret.
    pub fn new(config: &OpenAiConfig) -> Result<Self, InferenceError> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| InferenceError::Configuration("OpenAI API key missing".to_string()))?;

        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| InferenceError::Configuration(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initialized OpenAI text generator"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl TextGenerator for OpenAiGenerator {
    fn kind(&self) -> LlmProvider {
        LlmProvider::OpenAi
    }

    #[instrument(skip(self, request), fields(model = %self.model, purpose = ?request.purpose))]
    fn complete(&self, request: &CompletionRequest) -> Result<String, InferenceError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!("Sending chat completion request");

        let response = self.client.post(self.completions_url()).json(&body).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            warn!(status = %status, "Chat completion request failed");
            return Err(InferenceError::from_status(status, body));
        }

        let parsed: ChatResponse = response.json()?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| InferenceError::InvalidResponse("no choices in response".to_string()))?;

        debug!(chars = content.len(), "Chat completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn missing_key_is_configuration_error() {
        let err = OpenAiGenerator::new(&OpenAiConfig::default()).unwrap_err();
        assert!(matches!(err, InferenceError::Configuration(_)));
    }

    #[test]
    fn url_has_no_double_slash() {
        let config = OpenAiConfig {
            api_key: Some(SecretString::from("sk-test")),
            base_url: "https://api.example.com/v1/".to_string(),
            ..Default::default()
        };
        let generator = OpenAiGenerator::new(&config).unwrap();
        assert_eq!(
            generator.completions_url(),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(generator.kind(), LlmProvider::OpenAi);
    }
}
