//! Application configuration
//!
//! Split into focused sub-modules:
//! - `content`: sanitizer policy and accepted languages
//! - `logging`: tracing filter and output format
//! - `reload`: shared handle with explicit reload
//!
//! Provider sections reuse the config types of `ai_core` and `ai_speech`.
//!
//! Sources are layered, later ones winning:
//! 1. serde defaults on every field
//! 2. `storia.toml` in the working directory (optional), or an explicit file
//! 3. `STORIA__` environment variables, `__` between path segments
//!    (e.g. `STORIA__LLM__PROVIDER=openai`, `STORIA__SPEECH__EDGE__ENABLED=false`)

mod content;
mod logging;
mod reload;

use std::collections::HashMap;
use std::path::Path;

use ai_core::LlmConfig;
use ai_speech::SpeechConfig;
use serde::Deserialize;
use tracing::debug;

pub use content::ContentConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use reload::ConfigHandle;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "STORIA";

/// Default configuration file name, looked up without extension
pub const DEFAULT_CONFIG_FILE: &str = "storia";

/// Keys whose environment values are comma-separated lists
const ENV_LIST_KEYS: [&str; 2] = ["content.allowed_languages", "content.banned_terms"];

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Text generation provider selection
    #[serde(default)]
    pub llm: LlmConfig,

    /// Narration backends
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Content policy
    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `storia.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error when a source cannot be parsed or a value has the
    /// wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default file
    ///
    /// An explicit file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is missing or malformed, or a value has
    /// the wrong type.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::build(path, None)
    }

    /// Layer sources, taking environment values from `env` when given
    fn build(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .try_parsing(true)
            .source(env);
        for key in ENV_LIST_KEYS {
            environment = environment.with_list_parse_key(key);
        }

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        debug!(
            provider = %config.llm.provider,
            offline_mode = config.llm.offline_mode,
            file = ?path,
            "Configuration loaded"
        );
        Ok(config)
    }
}
