//! Remote authentication service trait.

use async_trait::async_trait;

use super::model::{LoginResponse, SystemStatus};
use crate::error::Result;

/// The server side of the vault's lock/unlock lifecycle.
///
/// Implementations carry the transport concerns (base URL, bearer header,
/// timeouts). Validation failures such as a password policy violation or a
/// confirmation mismatch must be returned as `VaultError::Validation` with
/// the server's own message.
#[async_trait]
pub trait RemoteAuthService: Send + Sync {
    /// Fetches whether the vault is initialized and whether it is locked.
    async fn get_status(&self) -> Result<SystemStatus>;

    /// Sets the master password for the first time.
    async fn setup(&self, password: &str, confirm_password: &str) -> Result<()>;

    /// Exchanges the master password for a bearer token.
    async fn login(&self, password: &str) -> Result<LoginResponse>;

    /// Invalidates the current token server side.
    async fn logout(&self) -> Result<()>;

    /// Locks the vault server side.
    async fn lock(&self) -> Result<()>;

    /// Replaces the master password.
    async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<()>;
}
