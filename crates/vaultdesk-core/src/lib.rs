//! Domain layer for vaultdesk.
//!
//! Models, collaborator traits and the shared error type. Nothing in this
//! crate performs I/O; concrete transports and storage live in
//! `vaultdesk-infrastructure`.

pub mod account;
pub mod config;
pub mod error;
pub mod session;
pub mod tag;

// Re-export common error type
pub use error::{Result, VaultError};
