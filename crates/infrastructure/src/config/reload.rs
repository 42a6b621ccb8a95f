//! Reloadable configuration handle

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{error, info};

use super::AppConfig;

/// Shared view of the current `AppConfig`
///
/// Readers get a cheap snapshot; `reload` re-reads the same sources and swaps
/// the value atomically. Components built from an earlier snapshot keep it.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<AppConfig>>,
    path: Option<PathBuf>,
}

impl ConfigHandle {
    /// Wrap an already loaded configuration
    #[must_use]
    pub fn new(config: AppConfig, path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
            path,
        }
    }

    /// Load from `path` (or the default file) and the environment
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::load_from`].
    pub fn load(path: Option<PathBuf>) -> Result<Self, config::ConfigError> {
        let config = AppConfig::load_from(path.as_deref())?;
        Ok(Self::new(config, path))
    }

    /// Get the current configuration
    #[must_use]
    pub fn current(&self) -> Arc<AppConfig> {
        self.inner.load_full()
    }

    /// Re-read all sources and replace the current configuration
    ///
    /// On failure the previous configuration stays in place.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::load_from`].
    pub fn reload(&self) -> Result<Arc<AppConfig>, config::ConfigError> {
        match AppConfig::load_from(self.path.as_deref()) {
            Ok(config) => {
                let config = Arc::new(config);
                let previous = self.inner.swap(Arc::clone(&config));
                info!(
                    old_provider = %previous.llm.provider,
                    new_provider = %config.llm.provider,
                    "Configuration reloaded"
                );
                Ok(config)
            },
            Err(e) => {
                error!(error = %e, "Failed to reload configuration; keeping previous");
                Err(e)
            },
        }
    }
}
