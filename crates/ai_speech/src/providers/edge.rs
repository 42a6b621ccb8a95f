//! Edge read-aloud neural voices over WebSocket
//!
//! The service speaks a small framed protocol on a single WebSocket:
//!
//! 1. client sends a `Path:speech.config` text message selecting MP3 output
//! 2. client sends a `Path:ssml` text message with the text to speak
//! 3. server streams binary frames; a frame starts with a big-endian `u16`
//!    header length, then headers, then payload. `Path:audio` frames carry MP3.
//! 4. a `Path:turn.end` text message ends the turn
//!
//! This is the only asynchronous backend. Each call builds a current-thread
//! runtime, drains the stream to completion on it and drops it before
//! returning, so callers stay synchronous.

use std::time::Duration;

use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tracing::{debug, instrument, warn};

use crate::config::EdgeTtsConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechBackend, SpeechBackendId};
use crate::types::{AudioData, AudioFormat, RenderedSpeech};

const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";
const ORIGIN: &str = "chrome-extension://jdiccldimpdaibmpdkjnbmckianbfold";

/// Edge TTS backend
#[derive(Debug, Clone)]
pub struct EdgeTtsBackend {
    config: EdgeTtsConfig,
}

impl EdgeTtsBackend {
    pub const fn new(config: EdgeTtsConfig) -> Self {
        Self { config }
    }

    /// Requested voice with any `edge:` prefix removed, else the language default
    fn resolve_voice(&self, language: &str, voice: Option<&str>) -> Option<String> {
        let requested = voice.map(|v| match v.split_once(':') {
            Some((prefix, rest)) if prefix.trim().eq_ignore_ascii_case("edge") => rest.trim(),
            _ => v.trim(),
        });

        requested
            .filter(|v| !v.is_empty())
            .or_else(|| self.config.voice_for(language))
            .map(ToString::to_string)
    }

    fn connection_url(&self) -> String {
        let separator = if self.config.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}ConnectionId={}",
            self.config.endpoint,
            uuid::Uuid::new_v4().simple()
        )
    }

    /// Stream one utterance to completion on a single-use runtime
    fn render(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeechError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SpeechError::SynthesisFailed(format!("Failed to start runtime: {e}")))?;

        let limit = Duration::from_millis(self.config.timeout_ms);
        runtime.block_on(async {
            tokio::time::timeout(limit, self.drain(text, voice))
                .await
                .map_err(|_| {
                    SpeechError::Timeout(format!(
                        "edge stream did not finish within {}ms",
                        self.config.timeout_ms
                    ))
                })?
        })
    }

    async fn drain(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeechError> {
        let mut request = self.connection_url().into_client_request()?;
        request
            .headers_mut()
            .insert("Origin", HeaderValue::from_static(ORIGIN));
        request.headers_mut().insert(
            "Pragma",
            HeaderValue::from_static("no-cache"),
        );

        let (mut ws, _) = connect_async(request).await?;
        debug!("Edge WebSocket connected");

        ws.send(Message::Text(speech_config_message().into())).await?;
        ws.send(Message::Text(
            ssml_message(text, voice, &self.config.rate, &self.config.pitch).into(),
        ))
        .await?;

        let mut audio = Vec::new();
        let mut finished = false;
        while let Some(message) = ws.next().await {
            match message? {
                Message::Binary(frame) => {
                    if let Some((headers, payload)) = split_binary_frame(&frame) {
                        if header_path(headers) == Some("audio") {
                            audio.extend_from_slice(payload);
                        }
                    }
                },
                Message::Text(body) => {
                    if header_path(body.as_str()) == Some("turn.end") {
                        finished = true;
                        break;
                    }
                },
                Message::Close(_) => break,
                _ => {},
            }
        }

        let _ = ws.close(None).await;

        if !finished {
            return Err(SpeechError::Stream(
                "stream closed before turn.end".to_string(),
            ));
        }
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        Ok(audio)
    }
}

impl SpeechBackend for EdgeTtsBackend {
    fn id(&self) -> SpeechBackendId {
        SpeechBackendId::Edge
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    fn synthesize(
        &self,
        text: &str,
        language: &str,
        voice: Option<&str>,
    ) -> Result<RenderedSpeech, SpeechError> {
        if !self.config.enabled {
            return Err(SpeechError::NotAvailable("edge tts disabled".to_string()));
        }

        let voice = self.resolve_voice(language, voice).ok_or_else(|| {
            SpeechError::Configuration(format!("no edge voice for language '{language}'"))
        })?;

        let mp3 = self.render(text, &voice).inspect_err(|e| {
            warn!(voice = %voice, error = %e, "Edge TTS stream failed");
        })?;

        let audio = AudioData::new(mp3, AudioFormat::Mp3);
        Ok(RenderedSpeech::new(audio.to_data_url(), voice))
    }
}

fn timestamp() -> String {
    Utc::now()
        .format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
        .to_string()
}

fn speech_config_message() -> String {
    format!(
        "X-Timestamp:{}\r\nContent-Type:application/json; charset=utf-8\r\nPath:speech.config\r\n\r\n\
         {{\"context\":{{\"synthesis\":{{\"audio\":{{\"metadataoptions\":{{\"sentenceBoundaryEnabled\":\"false\",\"wordBoundaryEnabled\":\"false\"}},\"outputFormat\":\"{OUTPUT_FORMAT}\"}}}}}}}}\r\n",
        timestamp()
    )
}

fn ssml_message(text: &str, voice: &str, rate: &str, pitch: &str) -> String {
    format!(
        "X-RequestId:{}\r\nContent-Type:application/ssml+xml\r\nX-Timestamp:{}Z\r\nPath:ssml\r\n\r\n\
         <speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='en-US'>\
         <voice name='{}'><prosody pitch='{}' rate='{}' volume='+0%'>{}</prosody></voice></speak>",
        uuid::Uuid::new_v4().simple(),
        timestamp(),
        escape_xml(voice),
        escape_xml(pitch),
        escape_xml(rate),
        escape_xml(text)
    )
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Split a binary frame into its header block and payload
pub(crate) fn split_binary_frame(frame: &[u8]) -> Option<(&str, &[u8])> {
    let len_bytes: [u8; 2] = frame.get(..2)?.try_into().ok()?;
    let header_len = usize::from(u16::from_be_bytes(len_bytes));
    let headers = frame.get(2..2 + header_len)?;
    let payload = frame.get(2 + header_len..)?;
    Some((std::str::from_utf8(headers).ok()?, payload))
}

/// Value of the `Path:` header in a header block
pub(crate) fn header_path(message: &str) -> Option<&str> {
    let headers = message.split("\r\n\r\n").next()?;
    headers
        .split("\r\n")
        .find_map(|line| line.strip_prefix("Path:"))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(headers: &str, payload: &[u8]) -> Vec<u8> {
        let mut out = u16::try_from(headers.len()).unwrap().to_be_bytes().to_vec();
        out.extend_from_slice(headers.as_bytes());
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn binary_frame_is_split() {
        let raw = frame("X-RequestId:1\r\nPath:audio\r\n", b"ID3");
        let (headers, payload) = split_binary_frame(&raw).unwrap();
        assert_eq!(header_path(headers), Some("audio"));
        assert_eq!(payload, b"ID3");
    }

    #[test]
    fn truncated_frame_is_rejected() {
        assert!(split_binary_frame(&[0]).is_none());
        assert!(split_binary_frame(&[0, 10, b'a']).is_none());
    }

    #[test]
    fn turn_end_is_detected_in_text_messages() {
        let msg = "X-RequestId:1\r\nContent-Type:application/json\r\nPath:turn.end\r\n\r\n{}";
        assert_eq!(header_path(msg), Some("turn.end"));
    }

    #[test]
    fn requested_voice_wins_and_prefix_is_stripped() {
        let backend = EdgeTtsBackend::new(EdgeTtsConfig::default());
        assert_eq!(
            backend.resolve_voice("it", Some("edge:it-IT-DiegoNeural")).as_deref(),
            Some("it-IT-DiegoNeural")
        );
        assert_eq!(
            backend.resolve_voice("it", None).as_deref(),
            Some("it-IT-IsabellaNeural")
        );
        assert_eq!(
            backend.resolve_voice("de", Some("  ")).as_deref(),
            Some("en-US-JennyNeural")
        );
    }

    #[test]
    fn ssml_escapes_text() {
        let msg = ssml_message("Tom & <Jerry>", "it-IT-IsabellaNeural", "+0%", "+0Hz");
        assert!(msg.contains("Path:ssml"));
        assert!(msg.contains("Tom &amp; &lt;Jerry&gt;"));
        assert!(msg.contains("<voice name='it-IT-IsabellaNeural'>"));
    }

    #[test]
    fn connection_url_appends_connection_id() {
        let backend = EdgeTtsBackend::new(EdgeTtsConfig {
            endpoint: "ws://127.0.0.1:9/tts".to_string(),
            ..Default::default()
        });
        assert!(backend.connection_url().starts_with("ws://127.0.0.1:9/tts?ConnectionId="));
        let default_backend = EdgeTtsBackend::new(EdgeTtsConfig::default());
        assert!(default_backend.connection_url().contains("&ConnectionId="));
    }

    #[test]
    fn disabled_backend_is_not_available() {
        let backend = EdgeTtsBackend::new(EdgeTtsConfig {
            enabled: false,
            ..Default::default()
        });
        assert!(matches!(
            backend.synthesize("Ciao", "it", None),
            Err(SpeechError::NotAvailable(_))
        ));
    }

    #[test]
    fn unreachable_endpoint_degrades_to_error() {
        let backend = EdgeTtsBackend::new(EdgeTtsConfig {
            endpoint: "ws://127.0.0.1:1/tts".to_string(),
            timeout_ms: 2_000,
            ..Default::default()
        });
        assert!(backend.synthesize("Ciao", "it", None).is_err());
    }
}
