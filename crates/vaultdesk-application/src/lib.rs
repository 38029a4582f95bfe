//! Application layer for vaultdesk.
//!
//! Coordinates local session and collection state against the remote vault
//! through the collaborator traits defined in `vaultdesk-core`.

pub mod accounts;
pub mod best_effort;
pub mod context;
pub mod session_controller;

#[cfg(test)]
mod test_support;

pub use accounts::{AccountCollectionStore, AccountListing, TagStore};
pub use best_effort::best_effort;
pub use context::VaultContext;
pub use session_controller::SessionController;
