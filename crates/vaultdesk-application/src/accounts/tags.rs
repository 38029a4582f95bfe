//! Tag list owned by the account collection store.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::debug;

use vaultdesk_core::account::StoreEvent;
use vaultdesk_core::error::Result;
use vaultdesk_core::tag::{RemoteTagService, Tag, TagCreate, TagUpdate};

use super::loading::LoadingFlag;

/// Cached tag catalogue.
///
/// Mutations are applied locally only after the server accepted them.
/// `account_count` is whatever the server last reported; account changes do
/// not recompute it.
pub struct TagStore {
    tag_service: Arc<dyn RemoteTagService>,
    tags: RwLock<Vec<Tag>>,
    loading: LoadingFlag,
    events: broadcast::Sender<StoreEvent>,
}

impl TagStore {
    pub(crate) fn new(
        tag_service: Arc<dyn RemoteTagService>,
        events: broadcast::Sender<StoreEvent>,
    ) -> Self {
        Self {
            tag_service,
            tags: RwLock::new(Vec::new()),
            loading: LoadingFlag::new(events.clone(), |loading| StoreEvent::TagsLoadingChanged {
                loading,
            }),
            events,
        }
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.read().clone()
    }

    pub fn find(&self, id: &str) -> Option<Tag> {
        self.read().iter().find(|tag| tag.id == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Replaces the cached list with the server's.
    pub async fn fetch_tags(&self) -> Result<Vec<Tag>> {
        let _loading = self.loading.begin();
        let tags = self.tag_service.list().await?;
        debug!(count = tags.len(), "Tags fetched");
        *self.write() = tags.clone();
        self.publish();
        Ok(tags)
    }

    /// Creates a tag and appends it to the cached list.
    pub async fn create_tag(&self, data: &TagCreate) -> Result<Tag> {
        let tag = self.tag_service.create(data).await?;
        self.write().push(tag.clone());
        self.publish();
        Ok(tag)
    }

    /// Updates a tag; the cached entry is replaced in place when present.
    pub async fn update_tag(&self, id: &str, data: &TagUpdate) -> Result<Tag> {
        let tag = self.tag_service.update(id, data).await?;
        let replaced = {
            let mut tags = self.write();
            match tags.iter_mut().find(|cached| cached.id == id) {
                Some(slot) => {
                    *slot = tag.clone();
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.publish();
        }
        Ok(tag)
    }

    /// Deletes a tag and drops it from the cached list.
    pub async fn delete_tag(&self, id: &str) -> Result<()> {
        self.tag_service.delete(id).await?;
        self.write().retain(|tag| tag.id != id);
        self.publish();
        Ok(())
    }

    pub(crate) fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Tag>> {
        self.tags.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Tag>> {
        self.tags.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) {
        let _ = self.events.send(StoreEvent::TagsChanged);
    }
}
