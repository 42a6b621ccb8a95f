//! Types for narration output

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Audio formats produced by the narration backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MP3 (Edge, ElevenLabs)
    Mp3,
    /// MP3 as labelled by Murf
    MurfMp3,
    /// WAV (local synthesis, HuggingFace)
    Wav,
}

impl AudioFormat {
    /// MIME type used in `data:` references
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::MurfMp3 => "audio/mp3",
            Self::Wav => "audio/wav",
        }
    }

    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 | Self::MurfMp3 => "mp3",
            Self::Wav => "wav",
        }
    }
}

/// Raw audio bytes with their format
#[derive(Clone, PartialEq, Eq)]
pub struct AudioData {
    data: Vec<u8>,
    format: AudioFormat,
}

impl fmt::Debug for AudioData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioData")
            .field("len", &self.data.len())
            .field("format", &self.format)
            .finish()
    }
}

impl AudioData {
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub const fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Inline `data:<mime>;base64,...` reference
    pub fn to_data_url(&self) -> String {
        data_url(self.format, &STANDARD.encode(&self.data))
    }
}

/// Build a `data:` reference from an already base64-encoded payload
pub fn data_url(format: AudioFormat, base64_payload: &str) -> String {
    format!("data:{};base64,{base64_payload}", format.mime_type())
}

/// Decode the bytes behind a `data:...;base64,` reference
///
/// Returns `None` for remote URLs or malformed references.
pub fn decode_data_url(reference: &str) -> Option<Vec<u8>> {
    let rest = reference.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(";base64,")?;
    STANDARD.decode(payload).ok()
}

/// Audio produced by one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSpeech {
    /// Remote URL or inline `data:` reference
    pub audio_url: String,
    /// Voice tag reported to callers
    pub voice: String,
}

impl RenderedSpeech {
    pub fn new(audio_url: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            audio_url: audio_url.into(),
            voice: voice.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_uses_mime_type() {
        let audio = AudioData::new(vec![1, 2, 3], AudioFormat::Wav);
        assert_eq!(audio.to_data_url(), "data:audio/wav;base64,AQID");
    }

    #[test]
    fn murf_reference_keeps_payload() {
        assert_eq!(
            data_url(AudioFormat::MurfMp3, "QUJD"),
            "data:audio/mp3;base64,QUJD"
        );
    }

    #[test]
    fn decode_roundtrips_inline_reference() {
        let audio = AudioData::new(b"RIFF".to_vec(), AudioFormat::Wav);
        assert_eq!(decode_data_url(&audio.to_data_url()).unwrap(), b"RIFF");
        assert!(decode_data_url("https://cdn.example.com/a.mp3").is_none());
    }

    #[test]
    fn debug_hides_bytes() {
        let audio = AudioData::new(vec![0; 1024], AudioFormat::Mp3);
        let debug = format!("{audio:?}");
        assert!(debug.contains("1024"));
        assert!(!debug.contains("0, 0"));
    }
}
