//! Session-scoped composition of the controller and the account store.

use std::sync::Arc;

use vaultdesk_core::account::RemoteAccountService;
use vaultdesk_core::session::{RemoteAuthService, TokenStore};
use vaultdesk_core::tag::RemoteTagService;

use crate::accounts::AccountCollectionStore;
use crate::session_controller::SessionController;

/// Everything a frontend needs for one vault session.
///
/// Built once from the collaborators and passed to whoever needs it; dropping
/// the context tears both components down.
pub struct VaultContext {
    pub session: Arc<SessionController>,
    pub accounts: Arc<AccountCollectionStore>,
}

impl VaultContext {
    /// Restores the session from `token_store` and creates an empty store.
    pub async fn new(
        auth_service: Arc<dyn RemoteAuthService>,
        token_store: Arc<dyn TokenStore>,
        account_service: Arc<dyn RemoteAccountService>,
        tag_service: Arc<dyn RemoteTagService>,
        page_size: u32,
    ) -> Self {
        let session = SessionController::restore(auth_service, token_store).await;
        let accounts = AccountCollectionStore::new(account_service, tag_service, page_size);

        Self {
            session: Arc::new(session),
            accounts: Arc::new(accounts),
        }
    }

    /// Locks the session and drops every cached account.
    ///
    /// A fetch still in flight may repopulate the store after this returns.
    pub async fn lock(&self) {
        self.session.lock().await;
        self.accounts.clear();
    }

    /// Logs out and drops every cached account.
    pub async fn logout(&self) {
        self.session.logout().await;
        self.accounts.clear();
    }
}
