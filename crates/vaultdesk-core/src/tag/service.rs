//! Remote tag service trait.

use async_trait::async_trait;

use super::model::{Tag, TagCreate, TagUpdate};
use crate::error::Result;

/// Server-side tag catalogue.
#[async_trait]
pub trait RemoteTagService: Send + Sync {
    /// Lists every tag with its current account count.
    async fn list(&self) -> Result<Vec<Tag>>;

    async fn get(&self, id: &str) -> Result<Tag>;

    async fn create(&self, data: &TagCreate) -> Result<Tag>;

    async fn update(&self, id: &str, data: &TagUpdate) -> Result<Tag>;

    async fn delete(&self, id: &str) -> Result<()>;
}
