//! Persistence slot for the bearer token.

use async_trait::async_trait;

use crate::error::Result;

/// A single, process-wide slot holding the persisted session token.
///
/// Only the session controller writes to it. Transports read it to build
/// their `Authorization` header.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the persisted token, `Ok(None)` when the slot is empty.
    async fn get_token(&self) -> Result<Option<String>>;

    /// Replaces the persisted token.
    async fn set_token(&self, token: &str) -> Result<()>;

    /// Empties the slot. Clearing an empty slot is not an error.
    async fn clear_token(&self) -> Result<()>;
}
