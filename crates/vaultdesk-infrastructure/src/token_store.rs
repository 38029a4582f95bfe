//! Bearer token slots.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};
use tokio::task;

use vaultdesk_core::error::{Result, VaultError};
use vaultdesk_core::session::TokenStore;

use crate::paths::VaultPaths;
use crate::storage::{AtomicTomlFile, FileMode};

#[derive(Serialize, Deserialize)]
struct TokenFile {
    access_token: String,
}

/// Token slot backed by `token.toml` in the config directory.
///
/// Written atomically with owner-only permissions; clearing the slot removes
/// the file. File work runs on the blocking pool.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(paths: &VaultPaths) -> Self {
        Self::at(paths.token_file())
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    async fn with_file<R, F>(&self, op: F) -> Result<R>
    where
        F: FnOnce(AtomicTomlFile<TokenFile>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = AtomicTomlFile::new(self.path.clone()).with_mode(FileMode::OwnerOnly);
        task::spawn_blocking(move || op(file))
            .await
            .map_err(|e| VaultError::io(format!("Failed to spawn blocking task: {}", e)))?
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get_token(&self) -> Result<Option<String>> {
        self.with_file(|file| {
            Ok(file
                .load()?
                .map(|file| file.access_token)
                .filter(|token| !token.is_empty()))
        })
        .await
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        let data = TokenFile {
            access_token: token.to_string(),
        };
        self.with_file(move |file| Ok(file.save(&data)?)).await
    }

    async fn clear_token(&self) -> Result<()> {
        self.with_file(|file| Ok(file.remove()?)).await
    }
}

/// In-process token slot; nothing survives the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    async fn clear_token(&self) -> Result<()> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(&VaultPaths::new(Some(dir.path())).unwrap());

        assert_eq!(store.get_token().await.unwrap(), None);

        store.set_token("jwt-1").await.unwrap();
        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("jwt-1"));

        store.set_token("jwt-2").await.unwrap();
        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("jwt-2"));

        store.clear_token().await.unwrap();
        assert_eq!(store.get_token().await.unwrap(), None);
        assert!(!dir.path().join("token.toml").exists());
    }

    #[tokio::test]
    async fn test_file_store_survives_new_instance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.toml");

        FileTokenStore::at(path.clone()).set_token("persisted").await.unwrap();

        let reopened = FileTokenStore::at(path);
        assert_eq!(reopened.get_token().await.unwrap().as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_clear_without_file_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::at(dir.path().join("token.toml"));

        assert!(store.clear_token().await.is_ok());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.toml");
        fs::write(&path, "access_token = ").unwrap();

        assert!(FileTokenStore::at(path).get_token().await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.toml");
        FileTokenStore::at(path.clone()).set_token("secret").await.unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_waiting_on_file_lock_keeps_runtime_free() {
        use fs2::FileExt;
        use std::sync::Arc;

        let dir = TempDir::new().unwrap();
        let held = fs::File::create(dir.path().join("token.lock")).unwrap();
        held.lock_exclusive().unwrap();

        let store = Arc::new(FileTokenStore::at(dir.path().join("token.toml")));
        let writer = tokio::spawn({
            let store = store.clone();
            async move { store.set_token("late").await }
        });

        // Single-threaded runtime: these only complete if the writer is
        // parked on the blocking pool.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!writer.is_finished());

        held.unlock().unwrap();
        writer.await.unwrap().unwrap();
        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("late"));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryTokenStore::new();

        store.set_token("abc").await.unwrap();
        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("abc"));

        store.clear_token().await.unwrap();
        assert_eq!(store.get_token().await.unwrap(), None);
    }
}
