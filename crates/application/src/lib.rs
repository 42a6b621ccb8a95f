//! Application layer - Use cases and orchestration
//!
//! Builds prompts, drives the story, narration and summary orchestrators and
//! defines the continuity port. Provider ports (`TextGenerator`,
//! `SpeechBackend`) come from `ai_core` and `ai_speech`; adapters for the
//! continuity port live in the infrastructure layer.

pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ApplicationError, GenerationStage};
pub use ports::*;
pub use services::*;
