//! HuggingFace Inference API client

use std::time::Duration;

use reqwest::blocking::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::{HuggingFaceConfig, LlmProvider};
use crate::error::InferenceError;
use crate::ports::{CompletionPurpose, CompletionRequest, TextGenerator};

/// Hosted text generator backed by `/models/{model}`
#[derive(Debug)]
pub struct HuggingFaceGenerator {
    client: Client,
    base_url: String,
    story_model: String,
    summary_model: String,
}

impl HuggingFaceGenerator {
    pub fn new(config: &HuggingFaceConfig) -> Result<Self, InferenceError> {
        let client = build_client(config)?;

        info!(
            base_url = %config.base_url,
            story_model = %config.story_model,
            "Initialized HuggingFace text generator"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            story_model: config.story_model.clone(),
            summary_model: config.summary_model.clone(),
        })
    }

    fn model_url(&self, purpose: CompletionPurpose) -> String {
        let model = match purpose {
            CompletionPurpose::Story => &self.story_model,
            CompletionPurpose::Summary => &self.summary_model,
        };
        format!("{}/models/{model}", self.base_url)
    }
}

/// Client carrying the bearer token and the hosted-inference timeout
fn build_client(config: &HuggingFaceConfig) -> Result<Client, InferenceError> {
    let api_key = config
        .api_key
        .as_ref()
        .map(|k| k.expose_secret().trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| InferenceError::Configuration("HuggingFace API key missing".to_string()))?;

    let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|e| InferenceError::Configuration(e.to_string()))?;
    auth.set_sensitive(true);

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(reqwest::header::AUTHORIZATION, auth);

    Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .default_headers(headers)
        .build()
        .map_err(|e| InferenceError::Configuration(e.to_string()))
}

#[derive(Debug, Serialize)]
struct InferenceBody {
    inputs: String,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    temperature: f32,
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// The API answers with either a list of generations or a single object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceOutput {
    Many(Vec<Generation>),
    One(Generation),
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    generated_text: String,
}

impl InferenceOutput {
    fn into_text(self) -> String {
        match self {
            Self::Many(items) => items
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .unwrap_or_default(),
            Self::One(g) => g.generated_text,
        }
    }
}

impl TextGenerator for HuggingFaceGenerator {
    fn kind(&self) -> LlmProvider {
        LlmProvider::HuggingFace
    }

    #[instrument(skip(self, request), fields(purpose = ?request.purpose))]
    fn complete(&self, request: &CompletionRequest) -> Result<String, InferenceError> {
        let inputs = if request.system.is_empty() {
            request.prompt.clone()
        } else {
            format!("{}\nPROMPT:\n{}", request.system, request.prompt)
        };

        let body = InferenceBody {
            inputs,
            parameters: InferenceParameters {
                temperature: request.temperature,
                max_new_tokens: request.max_tokens,
                return_full_text: false,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        debug!("Sending inference request to HuggingFace");

        let response = self
            .client
            .post(self.model_url(request.purpose))
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            warn!(status = %status, "HuggingFace inference request failed");
            return Err(InferenceError::from_status(status, body));
        }

        let output: InferenceOutput = response.json()?;
        let text = output.into_text().trim().to_string();
        if text.is_empty() {
            return Err(InferenceError::InvalidResponse(
                "empty generation from HuggingFace".to_string(),
            ));
        }

        Ok(text)
    }
}
