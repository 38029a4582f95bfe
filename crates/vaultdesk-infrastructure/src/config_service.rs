//! Configuration service implementation.
//!
//! Loads `ClientConfig` from `config.toml` in the vaultdesk config directory
//! and applies environment overrides.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use vaultdesk_core::config::ClientConfig;
use vaultdesk_core::error::Result;

use crate::paths::VaultPaths;
use crate::storage::AtomicTomlFile;

/// Overrides `base_url` when set and non-empty.
pub const ENV_BASE_URL: &str = "VAULTDESK_BASE_URL";

/// Loads and caches the client configuration.
///
/// A missing file yields the defaults; the file is never created implicitly.
#[derive(Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &VaultPaths) -> Self {
        Self {
            path: paths.config_file(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it from disk if not cached.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Some(cached) = self
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(cached.clone());
        }

        let mut config = AtomicTomlFile::<ClientConfig>::new(self.path.clone())
            .load()?
            .unwrap_or_default();
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        config.validate()?;
        debug!(path = %self.path.display(), base_url = %config.base_url, "Client config loaded");

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(config.clone());
        Ok(config)
    }

    /// Writes `config` to disk and replaces the cached copy.
    pub fn save_config(&self, config: &ClientConfig) -> Result<()> {
        config.validate()?;
        AtomicTomlFile::new(self.path.clone()).save(config)?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Applies `VAULTDESK_*` overrides read through `lookup`.
pub fn apply_env_overrides(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(base_url) = lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()) {
        config.base_url = base_url.trim().to_string();
    }
}
