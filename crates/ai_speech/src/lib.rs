//! AI Speech - Text-to-Speech backends for story narration
//!
//! Provides the `SpeechBackend` port and its adapters:
//! - `PiperBackend` - local synthesizer CLI
//! - `EdgeTtsBackend` - Edge read-aloud neural voices (WebSocket)
//! - `MurfBackend`, `ElevenLabsBackend`, `HuggingFaceTtsBackend` - hosted APIs
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the trait (port)
//! - `providers` module contains concrete implementations (adapters)
//!
//! Every backend returns its audio as an inline `data:` reference tagged with
//! the voice that produced it. Ordering and fallback between backends is the
//! caller's concern.
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{EdgeTtsBackend, SpeechBackend, SpeechConfig};
//!
//! let edge = EdgeTtsBackend::new(SpeechConfig::default().edge);
//! let speech = edge.synthesize("C'era una volta...", "it", None)?;
//! println!("{} spoke {} bytes of reference", speech.voice, speech.audio_url.len());
//! ```

pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use config::{
    EdgeTtsConfig, ElevenLabsConfig, HuggingFaceTtsConfig, LocalTtsConfig, MurfConfig,
    SpeechConfig,
};
pub use error::SpeechError;
pub use ports::{SpeechBackend, SpeechBackendId};
pub use providers::{
    EdgeTtsBackend, ElevenLabsBackend, HuggingFaceTtsBackend, MurfBackend, PiperBackend,
};
pub use types::{AudioData, AudioFormat, RenderedSpeech, data_url, decode_data_url};
