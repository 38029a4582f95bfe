//! List query types: filters, paging, and the paged response.

use serde::{Deserialize, Serialize};

use super::model::AccountRecord;

/// Page size used until the caller picks another one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Constraints on the account list. A `None` field is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpt_membership: Option<String>,
}

impl AccountFilters {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_tag_ids<I, S>(mut self, tag_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_ids = Some(tag_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_gpt_membership(mut self, membership: impl Into<String>) -> Self {
        self.gpt_membership = Some(membership.into());
        self
    }

    /// Partial update: every key present in `overrides` replaces the stored
    /// value, absent keys keep theirs.
    pub fn merge(&mut self, overrides: AccountFilters) {
        let AccountFilters {
            search,
            source,
            tag_ids,
            gpt_membership,
        } = overrides;

        if search.is_some() {
            self.search = search;
        }
        if source.is_some() {
            self.source = source;
        }
        if tag_ids.is_some() {
            self.tag_ids = tag_ids;
        }
        if gpt_membership.is_some() {
            self.gpt_membership = gpt_membership;
        }
    }

    /// `true` when no key constrains the list.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Query-string pairs for the list endpoint. Empty strings and empty tag
    /// sets are treated as absent; tag ids are comma-joined.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(source) = self.source.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("source", source.to_string()));
        }
        if let Some(tag_ids) = self.tag_ids.as_ref().filter(|ids| !ids.is_empty()) {
            pairs.push(("tag_ids", tag_ids.join(",")));
        }
        if let Some(membership) = self.gpt_membership.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("gpt_membership", membership.to_string()));
        }
        pairs
    }
}

/// A complete list request: filters plus the page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    pub filters: AccountFilters,
    pub page: u32,
    pub page_size: u32,
}

impl AccountQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        pairs.extend(self.filters.to_query_pairs());
        pairs
    }
}

/// One page of accounts as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPage {
    pub items: Vec<AccountRecord>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}
