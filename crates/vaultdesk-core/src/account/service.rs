//! Remote account service trait.

use async_trait::async_trait;

use super::batch::{BatchOutcome, TagMode};
use super::model::{AccountCreate, AccountRecord, AccountStats, AccountUpdate};
use super::query::{AccountPage, AccountQuery};
use crate::error::Result;

/// An abstract remote source of truth for account records.
///
/// This trait decouples the collection store from the transport (HTTP,
/// in-process test double, ...). Authorization is the implementation's
/// concern.
#[async_trait]
pub trait RemoteAccountService: Send + Sync {
    /// Lists one page of accounts matching the query.
    async fn list(&self, query: &AccountQuery) -> Result<AccountPage>;

    /// Fetches a single account.
    async fn get(&self, id: &str) -> Result<AccountRecord>;

    /// Fetches the decrypted password, `None` when the account has none.
    async fn get_password(&self, id: &str) -> Result<Option<String>>;

    /// Fetches the decrypted TOTP secret, `None` when the account has none.
    async fn get_totp(&self, id: &str) -> Result<Option<String>>;

    async fn create(&self, data: &AccountCreate) -> Result<AccountRecord>;

    /// Applies a partial update and returns the full, authoritative record.
    async fn update(&self, id: &str, data: &AccountUpdate) -> Result<AccountRecord>;

    /// Deletes an account; `hard` removes it permanently instead of
    /// soft-deleting it.
    async fn delete(&self, id: &str, hard: bool) -> Result<()>;

    /// Distinct account sources, in server order.
    async fn list_sources(&self) -> Result<Vec<String>>;

    async fn get_stats(&self) -> Result<AccountStats>;

    async fn batch_delete(&self, ids: &[String], hard: bool) -> Result<BatchOutcome>;

    async fn batch_update_tags(
        &self,
        ids: &[String],
        tag_ids: &[String],
        mode: TagMode,
    ) -> Result<BatchOutcome>;

    async fn batch_update(&self, ids: &[String], data: &AccountUpdate) -> Result<BatchOutcome>;
}
