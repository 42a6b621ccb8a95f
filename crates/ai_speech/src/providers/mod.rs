//! Narration backend implementations

pub mod edge;
pub mod elevenlabs;
pub mod huggingface;
pub mod murf;
pub mod piper;

pub use edge::EdgeTtsBackend;
pub use elevenlabs::ElevenLabsBackend;
pub use huggingface::HuggingFaceTtsBackend;
pub use murf::MurfBackend;
pub use piper::PiperBackend;
