use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{debug, info};

use vaultdesk_core::account::{
    AccountCreate, AccountFilters, AccountQuery, AccountRecord, AccountStats, AccountUpdate,
    BatchOutcome, DEFAULT_PAGE_SIZE, RemoteAccountService, StoreEvent, TagMode,
};
use vaultdesk_core::error::{Result, VaultError};
use vaultdesk_core::tag::{RemoteTagService, Tag};

use super::loading::LoadingFlag;
use super::tags::TagStore;

const EVENT_CAPACITY: usize = 64;

/// The cached page: items, total and total pages always come from the same
/// server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountListing {
    pub items: Vec<AccountRecord>,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for AccountListing {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 1,
        }
    }
}

#[derive(Debug)]
struct StoreState {
    listing: AccountListing,
    filters: AccountFilters,
    page: u32,
    page_size: u32,
    sources: Vec<String>,
    stats: Option<AccountStats>,
    current_account: Option<AccountRecord>,
}

impl StoreState {
    fn new(page_size: u32) -> Self {
        Self {
            listing: AccountListing::default(),
            filters: AccountFilters::default(),
            page: 1,
            page_size,
            sources: Vec::new(),
            stats: None,
            current_account: None,
        }
    }

    fn query(&self) -> AccountQuery {
        AccountQuery {
            filters: self.filters.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Filtered, paginated view over the remote account collection.
///
/// The server is the source of truth. Local edits are applied only after a
/// remote call succeeded, so a failed mutation needs no rollback. Plaintext
/// passwords and TOTP secrets pass through to the caller and are never
/// cached.
///
/// Overlapping fetches are not serialized: whichever response arrives last
/// replaces the listing.
pub struct AccountCollectionStore {
    account_service: Arc<dyn RemoteAccountService>,
    state: RwLock<StoreState>,
    loading: LoadingFlag,
    tags: TagStore,
    events: broadcast::Sender<StoreEvent>,
}

impl AccountCollectionStore {
    /// Creates an empty store. A `page_size` of zero falls back to the default.
    pub fn new(
        account_service: Arc<dyn RemoteAccountService>,
        tag_service: Arc<dyn RemoteTagService>,
        page_size: u32,
    ) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            account_service,
            state: RwLock::new(StoreState::new(page_size)),
            loading: LoadingFlag::new(events.clone(), |loading| StoreEvent::LoadingChanged {
                loading,
            }),
            tags: TagStore::new(tag_service, events.clone()),
            events,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn listing(&self) -> AccountListing {
        self.read().listing.clone()
    }

    pub fn accounts(&self) -> Vec<AccountRecord> {
        self.read().listing.items.clone()
    }

    pub fn total(&self) -> u64 {
        self.read().listing.total
    }

    pub fn total_pages(&self) -> u32 {
        self.read().listing.total_pages
    }

    pub fn page(&self) -> u32 {
        self.read().page
    }

    pub fn page_size(&self) -> u32 {
        self.read().page_size
    }

    pub fn filters(&self) -> AccountFilters {
        self.read().filters.clone()
    }

    pub fn sources(&self) -> Vec<String> {
        self.read().sources.clone()
    }

    pub fn stats(&self) -> Option<AccountStats> {
        self.read().stats.clone()
    }

    pub fn current_account(&self) -> Option<AccountRecord> {
        self.read().current_account.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// The store's tag list.
    pub fn tag_store(&self) -> &TagStore {
        &self.tags
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.tags.tags()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Merges `overrides` into the stored filters and fetches the current
    /// page.
    ///
    /// On success items, total and total pages are replaced together. On
    /// failure the previous listing stays and the error is returned. The
    /// loading flag is cleared either way.
    pub async fn fetch_accounts(&self, overrides: Option<AccountFilters>) -> Result<AccountListing> {
        let _loading = self.loading.begin();

        let changed_filters = overrides.is_some();
        let query = {
            let mut state = self.write();
            if let Some(overrides) = overrides {
                state.filters.merge(overrides);
            }
            state.query()
        };
        if changed_filters {
            self.publish(StoreEvent::QueryChanged);
        }

        debug!(page = query.page, page_size = query.page_size, "Fetching accounts");
        let response = self.account_service.list(&query).await?;

        let listing = AccountListing {
            items: response.items,
            total: response.total,
            total_pages: response.total_pages,
        };
        self.write().listing = listing.clone();
        debug!(
            count = listing.items.len(),
            total = listing.total,
            "Account listing replaced"
        );
        self.publish(StoreEvent::ListingReplaced {
            total: listing.total,
            page: query.page,
        });

        Ok(listing)
    }

    pub async fn fetch_sources(&self) -> Result<Vec<String>> {
        let sources = self.account_service.list_sources().await?;
        self.write().sources = sources.clone();
        self.publish(StoreEvent::SourcesLoaded);
        Ok(sources)
    }

    pub async fn fetch_stats(&self) -> Result<AccountStats> {
        let stats = self.account_service.get_stats().await?;
        self.write().stats = Some(stats.clone());
        self.publish(StoreEvent::StatsLoaded);
        Ok(stats)
    }

    pub async fn fetch_tags(&self) -> Result<Vec<Tag>> {
        self.tags.fetch_tags().await
    }

    /// Fetches one record into the editing slot.
    pub async fn load_current_account(&self, id: &str) -> Result<AccountRecord> {
        let record = self.account_service.get(id).await?;
        self.write().current_account = Some(record.clone());
        self.publish(StoreEvent::CurrentAccountChanged);
        Ok(record)
    }

    pub fn clear_current_account(&self) {
        let previous = self.write().current_account.take();
        if previous.is_some() {
            self.publish(StoreEvent::CurrentAccountChanged);
        }
    }

    // ------------------------------------------------------------------------
    // Secrets
    // ------------------------------------------------------------------------

    /// Decrypted password for `id`, handed to the caller only.
    pub async fn get_password(&self, id: &str) -> Result<Option<String>> {
        debug!(account_id = %id, "Requesting password");
        self.account_service.get_password(id).await
    }

    /// TOTP secret for `id`, handed to the caller only.
    pub async fn get_totp(&self, id: &str) -> Result<Option<String>> {
        debug!(account_id = %id, "Requesting TOTP secret");
        self.account_service.get_totp(id).await
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Creates an account and refetches the current page.
    ///
    /// When the create succeeds but the refetch fails, the refetch error is
    /// returned; the record exists on the server regardless.
    pub async fn create_account(&self, data: &AccountCreate) -> Result<AccountRecord> {
        let record = self.account_service.create(data).await?;
        info!(account_id = %record.id, "Account created");
        self.fetch_accounts(None).await?;
        Ok(record)
    }

    /// Updates an account and replaces its cached row in place.
    ///
    /// No refetch happens, so the row stays put even if it no longer matches
    /// the active filters. An id outside the cached page is not an error.
    pub async fn update_account(&self, id: &str, data: &AccountUpdate) -> Result<AccountRecord> {
        let record = self.account_service.update(id, data).await?;

        let (in_listing, is_current) = {
            let mut state = self.write();
            let in_listing = match state.listing.items.iter_mut().find(|cached| cached.id == id) {
                Some(slot) => {
                    *slot = record.clone();
                    true
                }
                None => false,
            };
            let is_current = match state.current_account.as_mut() {
                Some(current) if current.id == id => {
                    *current = record.clone();
                    true
                }
                _ => false,
            };
            (in_listing, is_current)
        };

        if in_listing {
            self.publish(StoreEvent::AccountUpdated { id: id.to_string() });
        }
        if is_current {
            self.publish(StoreEvent::CurrentAccountChanged);
        }
        Ok(record)
    }

    /// Soft-deletes an account and refetches the current page.
    pub async fn delete_account(&self, id: &str) -> Result<()> {
        self.remove(id, false).await
    }

    /// Permanently deletes an account and refetches the current page.
    pub async fn hard_delete_account(&self, id: &str) -> Result<()> {
        self.remove(id, true).await
    }

    async fn remove(&self, id: &str, hard: bool) -> Result<()> {
        self.account_service.delete(id, hard).await?;
        info!(account_id = %id, hard, "Account deleted");
        self.fetch_accounts(None).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Paging
    // ------------------------------------------------------------------------

    /// Moves to page `page` (1-based) and refetches.
    pub async fn set_page(&self, page: u32) -> Result<AccountListing> {
        if page == 0 {
            return Err(VaultError::validation("Page must be at least 1"));
        }
        self.write().page = page;
        self.publish(StoreEvent::QueryChanged);
        self.fetch_accounts(None).await
    }

    /// Changes the page size, returns to page 1 and refetches.
    pub async fn set_page_size(&self, page_size: u32) -> Result<AccountListing> {
        if page_size == 0 {
            return Err(VaultError::validation("Page size must be at least 1"));
        }
        {
            let mut state = self.write();
            state.page_size = page_size;
            state.page = 1;
        }
        self.publish(StoreEvent::QueryChanged);
        self.fetch_accounts(None).await
    }

    /// Drops every filter, returns to page 1 and refetches.
    pub async fn reset_filters(&self) -> Result<AccountListing> {
        {
            let mut state = self.write();
            state.filters = AccountFilters::default();
            state.page = 1;
        }
        self.publish(StoreEvent::QueryChanged);
        self.fetch_accounts(None).await
    }

    /// Replaces the filters (no merge) and the page, then fetches once.
    pub async fn apply_query(&self, filters: AccountFilters, page: u32) -> Result<AccountListing> {
        if page == 0 {
            return Err(VaultError::validation("Page must be at least 1"));
        }
        {
            let mut state = self.write();
            state.filters = filters;
            state.page = page;
        }
        self.publish(StoreEvent::QueryChanged);
        self.fetch_accounts(None).await
    }

    // ------------------------------------------------------------------------
    // Batch
    // ------------------------------------------------------------------------
    //
    // Batch results are reported, not reconciled: callers decide whether to
    // refetch.

    pub async fn batch_delete(&self, ids: &[String], hard: bool) -> Result<BatchOutcome> {
        let outcome = self.account_service.batch_delete(ids, hard).await?;
        info!(
            requested = ids.len(),
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            hard,
            "Batch delete finished"
        );
        Ok(outcome)
    }

    pub async fn batch_update_tags(
        &self,
        ids: &[String],
        tag_ids: &[String],
        mode: TagMode,
    ) -> Result<BatchOutcome> {
        let outcome = self
            .account_service
            .batch_update_tags(ids, tag_ids, mode)
            .await?;
        info!(
            requested = ids.len(),
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            %mode,
            "Batch tag update finished"
        );
        Ok(outcome)
    }

    pub async fn batch_update(&self, ids: &[String], data: &AccountUpdate) -> Result<BatchOutcome> {
        let outcome = self.account_service.batch_update(ids, data).await?;
        info!(
            requested = ids.len(),
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "Batch update finished"
        );
        Ok(outcome)
    }

    // ------------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------------

    /// Drops every cached value and returns to the initial query.
    pub fn clear(&self) {
        {
            let mut state = self.write();
            let page_size = state.page_size;
            *state = StoreState::new(page_size);
        }
        self.tags.clear();
        self.publish(StoreEvent::Cleared);
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: StoreEvent) {
        let _ = self.events.send(event);
    }
}
