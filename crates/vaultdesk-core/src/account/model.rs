//! Account domain models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tag::Tag;

/// One account as listed by the server.
///
/// Secrets are never part of this type: `has_password` and `has_totp` only
/// say whether a secret exists. The plaintext is fetched on demand through
/// `RemoteAccountService::get_password` / `get_totp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub sub2api: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub browser: Option<String>,
    #[serde(default)]
    pub gpt_membership: Option<String>,
    #[serde(default)]
    pub family_group: Option<String>,
    #[serde(default)]
    pub recovery_email: Option<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    pub has_password: bool,
    pub has_totp: bool,
    /// Display order matters; membership has set semantics.
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreate {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totp_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub2api: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpt_membership: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_email: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<String>,
}

impl AccountCreate {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }
}

/// Partial account update. Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totp_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub2api: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpt_membership: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
}

impl AccountUpdate {
    /// `true` when no field would be sent.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Aggregate counts over the whole vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    pub total: u64,
    #[serde(rename = "with_gpt_membership")]
    pub with_membership: u64,
    #[serde(default)]
    pub by_source: BTreeMap<String, u64>,
}
