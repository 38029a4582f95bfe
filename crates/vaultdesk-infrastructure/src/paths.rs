//! Path management for vaultdesk client files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/vaultdesk/         # Config directory (platform default via `dirs`)
//! ├── config.toml              # Client configuration
//! └── token.toml               # Persisted bearer token (0600)
//! ```

use std::path::{Path, PathBuf};

use vaultdesk_core::error::{Result, VaultError};

const APP_DIR_NAME: &str = "vaultdesk";
const CONFIG_FILE_NAME: &str = "config.toml";
const TOKEN_FILE_NAME: &str = "token.toml";

/// Resolves the files the client reads and writes.
///
/// Every path hangs off one config directory: the platform default, or an
/// explicit base directory (tests, portable installs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    config_dir: PathBuf,
}

impl VaultPaths {
    /// Uses `base_path` when given, otherwise `<platform config dir>/vaultdesk`.
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let config_dir = match base_path {
            Some(base) => base.to_path_buf(),
            None => dirs::config_dir()
                .ok_or_else(|| VaultError::config("Cannot find the user config directory"))?
                .join(APP_DIR_NAME),
        };
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    pub fn token_file(&self) -> PathBuf {
        self.config_dir.join(TOKEN_FILE_NAME)
    }
}
