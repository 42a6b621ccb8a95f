//! Configuration for narration backends

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Configuration for every speech backend in the narration chain
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeechConfig {
    /// Local synthesizer (Piper-compatible CLI)
    #[serde(default)]
    pub local: LocalTtsConfig,

    /// Microsoft Edge read-aloud neural voices
    #[serde(default)]
    pub edge: EdgeTtsConfig,

    /// Murf.ai
    #[serde(default)]
    pub murf: MurfConfig,

    /// ElevenLabs
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,
}

/// Local synthesizer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LocalTtsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Synthesizer executable; looked up on `PATH` when relative
    #[serde(default = "default_executable_path")]
    pub executable_path: PathBuf,

    /// Default voice model (`.onnx`)
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Voice models keyed by voice name or language code
    #[serde(default)]
    pub voices: HashMap<String, PathBuf>,

    /// Upper bound on one synthesis run, in milliseconds
    #[serde(default = "default_local_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LocalTtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            executable_path: default_executable_path(),
            model_path: None,
            voices: HashMap::new(),
            timeout_ms: default_local_timeout_ms(),
        }
    }
}

/// Edge read-aloud configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeTtsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// WebSocket endpoint, including the client token query
    #[serde(default = "default_edge_endpoint")]
    pub endpoint: String,

    /// Prosody rate, e.g. `+0%`, `-10%`
    #[serde(default = "default_edge_rate")]
    pub rate: String,

    /// Prosody pitch, e.g. `+0Hz`
    #[serde(default = "default_edge_pitch")]
    pub pitch: String,

    /// Default voice per language code; the `default` entry is the fallback
    #[serde(default = "default_edge_voice_map")]
    pub voice_map: HashMap<String, String>,

    /// Upper bound on one synthesis stream, in milliseconds
    #[serde(default = "default_edge_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for EdgeTtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_edge_endpoint(),
            rate: default_edge_rate(),
            pitch: default_edge_pitch(),
            voice_map: default_edge_voice_map(),
            timeout_ms: default_edge_timeout_ms(),
        }
    }
}

impl EdgeTtsConfig {
    /// Voice for a language, falling back to the `default` entry
    pub fn voice_for(&self, language: &str) -> Option<&str> {
        self.voice_map
            .get(language)
            .or_else(|| self.voice_map.get("default"))
            .map(String::as_str)
    }
}

/// Murf.ai configuration
#[derive(Clone, Deserialize)]
pub struct MurfConfig {
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default)]
    pub voice_id: Option<String>,

    #[serde(default = "default_murf_base_url")]
    pub base_url: String,

    #[serde(default = "default_murf_timeout_ms")]
    pub timeout_ms: u64,
}

impl fmt::Debug for MurfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MurfConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("voice_id", &self.voice_id)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl Default for MurfConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: None,
            base_url: default_murf_base_url(),
            timeout_ms: default_murf_timeout_ms(),
        }
    }
}

impl MurfConfig {
    /// Murf needs both a key and a voice
    pub fn is_configured(&self) -> bool {
        has_secret(self.api_key.as_ref())
            && self.voice_id.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}

/// ElevenLabs configuration
#[derive(Clone, Deserialize)]
pub struct ElevenLabsConfig {
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Voice; when unset, `bella` for Italian and `rachel` otherwise
    #[serde(default)]
    pub voice_id: Option<String>,

    #[serde(default = "default_elevenlabs_base_url")]
    pub base_url: String,

    #[serde(default = "default_elevenlabs_model")]
    pub model_id: String,

    #[serde(default = "default_elevenlabs_timeout_ms")]
    pub timeout_ms: u64,
}

impl fmt::Debug for ElevenLabsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevenLabsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("voice_id", &self.voice_id)
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: None,
            base_url: default_elevenlabs_base_url(),
            model_id: default_elevenlabs_model(),
            timeout_ms: default_elevenlabs_timeout_ms(),
        }
    }
}

impl ElevenLabsConfig {
    pub fn is_configured(&self) -> bool {
        has_secret(self.api_key.as_ref())
    }
}

/// HuggingFace text-to-speech settings
///
/// Not part of [`SpeechConfig`]: the backend is only used when HuggingFace is
/// the active LLM provider and shares that provider's credentials.
#[derive(Clone)]
pub struct HuggingFaceTtsConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl fmt::Debug for HuggingFaceTtsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceTtsConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

pub(crate) fn has_secret(secret: Option<&SecretString>) -> bool {
    secret.is_some_and(|s| !s.expose_secret().trim().is_empty())
}

const fn default_true() -> bool {
    true
}

fn default_executable_path() -> PathBuf {
    PathBuf::from("piper")
}

const fn default_local_timeout_ms() -> u64 {
    60_000
}

fn default_edge_endpoint() -> String {
    "wss://speech.platform.bing.com/consumer/speech/synthesize/readaloud/edge/v1?TrustedClientToken=6A5AA1D4EAFF4E9FB37E23D68491D6F4".to_string()
}

fn default_edge_rate() -> String {
    "+0%".to_string()
}

fn default_edge_pitch() -> String {
    "+0Hz".to_string()
}

fn default_edge_voice_map() -> HashMap<String, String> {
    [
        ("ar", "ar-SA-HamedNeural"),
        ("en", "en-GB-LibbyNeural"),
        ("es", "es-ES-ElviraNeural"),
        ("fr", "fr-FR-DeniseNeural"),
        ("it", "it-IT-IsabellaNeural"),
        ("default", "en-US-JennyNeural"),
    ]
    .into_iter()
    .map(|(lang, voice)| (lang.to_string(), voice.to_string()))
    .collect()
}

const fn default_edge_timeout_ms() -> u64 {
    60_000
}

fn default_murf_base_url() -> String {
    "https://api.murf.ai/v1".to_string()
}

const fn default_murf_timeout_ms() -> u64 {
    90_000
}

fn default_elevenlabs_base_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_elevenlabs_model() -> String {
    "eleven_multilingual_v2".to_string()
}

const fn default_elevenlabs_timeout_ms() -> u64 {
    30_000
}
