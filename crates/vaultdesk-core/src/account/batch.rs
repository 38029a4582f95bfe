//! Bulk operation types.

use serde::{Deserialize, Serialize};

/// How `batch_update_tags` combines the given tags with each account's
/// current ones.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TagMode {
    /// Keep existing tags and add the given ones.
    #[default]
    Add,
    /// Drop the given tags.
    Remove,
    /// Replace all tags with the given ones.
    Set,
}

/// Per-id tally of a bulk operation. A partial failure is reported here,
/// never raised as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    #[serde(alias = "deleted", alias = "updated")]
    pub succeeded: u64,
    pub failed: u64,
}

impl BatchOutcome {
    /// Some ids succeeded and some failed.
    pub fn is_partial_failure(&self) -> bool {
        self.succeeded > 0 && self.failed > 0
    }

    /// At least one id failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
