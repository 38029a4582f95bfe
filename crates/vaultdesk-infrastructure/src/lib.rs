//! Infrastructure layer for vaultdesk.
//!
//! Concrete implementations of the collaborator traits from `vaultdesk-core`:
//! the HTTP transport, token slots, config loading and path resolution.

pub mod config_service;
pub mod http;
pub mod paths;
pub mod storage;
pub mod token_store;

pub use crate::config_service::ConfigService;
pub use crate::http::{ApiClient, HttpAccountService, HttpAuthService, HttpTagService};
pub use crate::paths::VaultPaths;
pub use crate::token_store::{FileTokenStore, MemoryTokenStore};
