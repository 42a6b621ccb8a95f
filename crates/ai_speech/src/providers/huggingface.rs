//! HuggingFace hosted text-to-speech backend

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::HuggingFaceTtsConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechBackend, SpeechBackendId};
use crate::types::{AudioData, AudioFormat, RenderedSpeech};

/// Speaks through the configured HuggingFace TTS model
#[derive(Debug)]
pub struct HuggingFaceTtsBackend {
    client: Client,
    url: String,
    model: String,
}

impl HuggingFaceTtsBackend {
    pub fn new(config: &HuggingFaceTtsConfig) -> Result<Self, SpeechError> {
        let api_key = config.api_key.expose_secret().trim();
        if api_key.is_empty() || config.model.trim().is_empty() {
            return Err(SpeechError::Configuration(
                "HuggingFace TTS needs an API key and a model".to_string(),
            ));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| SpeechError::Configuration(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("audio/wav"));

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| SpeechError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            url: format!(
                "{}/models/{}",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            model: config.model.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct TtsBody<'a> {
    inputs: &'a str,
    parameters: TtsParameters,
    options: TtsOptions,
}

#[derive(Debug, Serialize)]
struct TtsParameters {
    return_full_text: bool,
}

#[derive(Debug, Serialize)]
struct TtsOptions {
    wait_for_model: bool,
}

impl SpeechBackend for HuggingFaceTtsBackend {
    fn id(&self) -> SpeechBackendId {
        SpeechBackendId::HuggingFace
    }

    #[instrument(skip(self, text, _voice), fields(text_len = text.len(), model = %self.model))]
    fn synthesize(
        &self,
        text: &str,
        _language: &str,
        _voice: Option<&str>,
    ) -> Result<RenderedSpeech, SpeechError> {
        let body = TtsBody {
            inputs: text,
            parameters: TtsParameters {
                return_full_text: false,
            },
            options: TtsOptions {
                wait_for_model: true,
            },
        };

        debug!("Sending HuggingFace TTS request");

        let response = self.client.post(&self.url).json(&body).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            warn!(status = %status, "HuggingFace TTS request failed");
            return Err(SpeechError::from_status(status, body));
        }

        let bytes = response.bytes()?;
        if bytes.is_empty() {
            warn!("HuggingFace TTS returned empty audio");
            return Err(SpeechError::EmptyAudio);
        }

        let audio = AudioData::new(bytes.to_vec(), AudioFormat::Wav);
        Ok(RenderedSpeech::new(audio.to_data_url(), self.model.clone()))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn url_includes_model() {
        let backend = HuggingFaceTtsBackend::new(&HuggingFaceTtsConfig {
            api_key: SecretString::from("hf"),
            base_url: "https://hf.example.com/".to_string(),
            model: "suno/bark-small".to_string(),
            timeout_ms: 1_000,
        })
        .unwrap();
        assert_eq!(backend.url, "https://hf.example.com/models/suno/bark-small");
    }

    #[test]
    fn blank_key_is_rejected() {
        let result = HuggingFaceTtsBackend::new(&HuggingFaceTtsConfig {
            api_key: SecretString::from(" "),
            base_url: "https://hf.example.com".to_string(),
            model: "suno/bark-small".to_string(),
            timeout_ms: 1_000,
        });
        assert!(result.is_err());
    }
}
