//! ElevenLabs text-to-speech backend

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::ElevenLabsConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechBackend, SpeechBackendId};
use crate::types::{AudioData, AudioFormat, RenderedSpeech};

/// ElevenLabs backend
#[derive(Debug)]
pub struct ElevenLabsBackend {
    client: Client,
    base_url: String,
    model_id: String,
    voice_id: Option<String>,
}

impl ElevenLabsBackend {
    pub fn new(config: &ElevenLabsConfig) -> Result<Self, SpeechError> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SpeechError::Configuration("ElevenLabs API key missing".to_string()))?;

        let mut key_header = HeaderValue::from_str(&api_key)
            .map_err(|e| SpeechError::Configuration(e.to_string()))?;
        key_header.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("xi-api-key", key_header);
        headers.insert(ACCEPT, HeaderValue::from_static("audio/mpeg"));

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| SpeechError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_id: config.model_id.clone(),
            voice_id: config
                .voice_id
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string),
        })
    }

    /// Configured voice, else a stock voice suited to the language
    fn voice_for(&self, language: &str) -> &str {
        match &self.voice_id {
            Some(voice) => voice,
            None if language == "it" => "bella",
            None => "rachel",
        }
    }
}

#[derive(Debug, Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    style: f32,
}

impl SpeechBackend for ElevenLabsBackend {
    fn id(&self) -> SpeechBackendId {
        SpeechBackendId::ElevenLabs
    }

    #[instrument(skip(self, text, _voice), fields(text_len = text.len()))]
    fn synthesize(
        &self,
        text: &str,
        language: &str,
        _voice: Option<&str>,
    ) -> Result<RenderedSpeech, SpeechError> {
        let voice_id = self.voice_for(language);
        let body = ElevenLabsRequest {
            text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings {
                stability: 0.4,
                style: 0.4,
            },
        };

        debug!(voice_id = %voice_id, "Sending ElevenLabs TTS request");

        let response = self
            .client
            .post(format!("{}/v1/text-to-speech/{voice_id}", self.base_url))
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            warn!(status = %status, "ElevenLabs TTS request failed");
            return Err(SpeechError::from_status(status, body));
        }

        let bytes = response.bytes()?;
        if bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        let audio = AudioData::new(bytes.to_vec(), AudioFormat::Mp3);
        Ok(RenderedSpeech::new(audio.to_data_url(), voice_id))
    }
}
