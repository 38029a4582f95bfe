pub mod accounts;
pub mod config;
pub mod session;
pub mod tags;

use anyhow::Result;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use vaultdesk_application::VaultContext;
use vaultdesk_core::config::ClientConfig;
use vaultdesk_core::session::TokenStore;
use vaultdesk_infrastructure::{
    ApiClient, FileTokenStore, HttpAccountService, HttpAuthService, HttpTagService, VaultPaths,
};

pub use accounts::AccountsAction;
pub use config::ConfigAction;
pub use tags::TagsAction;

/// Composition root for one CLI invocation.
pub struct Context {
    pub vault: VaultContext,
    pub base_url: String,
    pub token_path: PathBuf,
    pub json: bool,
}

impl Context {
    pub async fn build(
        paths: &VaultPaths,
        config: &ClientConfig,
        page_size: u32,
        json: bool,
    ) -> Result<Self> {
        let token_store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(paths));
        let api = ApiClient::new(config, token_store.clone())?;

        let vault = VaultContext::new(
            Arc::new(HttpAuthService::new(api.clone())),
            token_store,
            Arc::new(HttpAccountService::new(api.clone())),
            Arc::new(HttpTagService::new(api)),
            page_size,
        )
        .await;

        Ok(Self {
            vault,
            base_url: config.base_url.clone(),
            token_path: paths.token_file(),
            json,
        })
    }

    /// Prints `value` as pretty JSON in `--json` mode, otherwise `text()`.
    pub fn emit(&self, value: Value, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}
