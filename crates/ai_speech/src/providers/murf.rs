//! Murf.ai text-to-speech backend

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::MurfConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechBackend, SpeechBackendId};
use crate::types::{AudioFormat, RenderedSpeech, data_url};

/// Murf backend; always speaks with the configured voice
#[derive(Debug)]
pub struct MurfBackend {
    client: Client,
    base_url: String,
    voice_id: String,
}

impl MurfBackend {
    pub fn new(config: &MurfConfig) -> Result<Self, SpeechError> {
        let api_key = config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SpeechError::Configuration("Murf API key missing".to_string()))?;
        let voice_id = config
            .voice_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| SpeechError::Configuration("Murf voice ID missing".to_string()))?
            .to_string();

        let mut key_header = HeaderValue::from_str(&api_key)
            .map_err(|e| SpeechError::Configuration(e.to_string()))?;
        key_header.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key_header);

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| SpeechError::Configuration(e.to_string()))?;

        info!(voice_id = %voice_id, "Initialized Murf TTS backend");

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            voice_id,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MurfRequest<'a> {
    voice_id: &'a str,
    text: &'a str,
    rate: i32,
    pitch: i32,
    sample_rate: u32,
    format: &'static str,
    channel_type: &'static str,
    pronunciation_dictionary: serde_json::Map<String, serde_json::Value>,
    encode_as_base64: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MurfResponse {
    #[serde(default)]
    audio_file: Option<String>,
}

impl SpeechBackend for MurfBackend {
    fn id(&self) -> SpeechBackendId {
        SpeechBackendId::Murf
    }

    #[instrument(skip(self, text, _voice), fields(text_len = text.len(), voice_id = %self.voice_id))]
    fn synthesize(
        &self,
        text: &str,
        _language: &str,
        _voice: Option<&str>,
    ) -> Result<RenderedSpeech, SpeechError> {
        let body = MurfRequest {
            voice_id: &self.voice_id,
            text,
            rate: 0,
            pitch: 0,
            sample_rate: 48_000,
            format: "MP3",
            channel_type: "STEREO",
            pronunciation_dictionary: serde_json::Map::new(),
            encode_as_base64: true,
        };

        debug!("Sending Murf TTS request");

        let response = self
            .client
            .post(format!("{}/text-to-speech", self.base_url))
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            warn!(status = %status, "Murf TTS request failed");
            return Err(SpeechError::from_status(status, body));
        }

        let parsed: MurfResponse = response
            .json()
            .map_err(|e| SpeechError::InvalidResponse(e.to_string()))?;

        let audio = parsed
            .audio_file
            .filter(|a| !a.trim().is_empty())
            .ok_or(SpeechError::EmptyAudio)?;

        Ok(RenderedSpeech::new(
            data_url(AudioFormat::MurfMp3, audio.trim()),
            self.voice_id.clone(),
        ))
    }
}
