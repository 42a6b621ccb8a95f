//! Infrastructure layer - Configuration, wiring and adapters
//!
//! Loads `AppConfig`, installs tracing, implements the continuity port and
//! assembles the story pipeline from the configured providers.

pub mod config;
pub mod context;
pub mod error;
pub mod persistence;
pub mod telemetry;

pub use config::{AppConfig, ConfigHandle, ContentConfig, LogFormat, LoggingConfig};
pub use context::{AppContext, huggingface_tts_config, narration_backends};
pub use error::InfrastructureError;
pub use persistence::InMemoryContinuityStore;
pub use telemetry::init_tracing;
