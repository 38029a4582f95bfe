use serde::Serialize;

/// Notifications published by the account collection store after each
/// committed change to its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// `loading` flipped.
    LoadingChanged { loading: bool },
    /// Items, total and total pages were replaced together.
    ListingReplaced { total: u64, page: u32 },
    /// One cached row was replaced by an update response.
    AccountUpdated { id: String },
    /// Filters or paging changed ahead of a refetch.
    QueryChanged,
    SourcesLoaded,
    StatsLoaded,
    /// The tag list's own `loading` flipped.
    TagsLoadingChanged { loading: bool },
    /// The tag list changed (fetch, create, update or delete).
    TagsChanged,
    /// The record held for editing changed.
    CurrentAccountChanged,
    /// Every cached value was dropped (session ended).
    Cleared,
}
