//! Session lifecycle controller.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use vaultdesk_core::error::Result;
use vaultdesk_core::session::{
    LoginResponse, RemoteAuthService, Session, SessionEvent, SessionState, SystemStatus, TokenStore,
};

use crate::best_effort::best_effort;

const EVENT_CAPACITY: usize = 64;

/// Owns the lock/unlock state machine and the bearer credential.
///
/// `SessionController` is responsible for:
/// - Restoring the persisted token at startup
/// - Refreshing `initialized`/`locked` from the server
/// - Login (commit only after remote success) and persisting the token
/// - Lock and logout, which always succeed locally whatever the server says
///
/// Reads go through synchronous accessors; changes are announced on a
/// broadcast channel (`subscribe`).
pub struct SessionController {
    session: RwLock<Session>,
    auth_service: Arc<dyn RemoteAuthService>,
    token_store: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    /// Creates a controller whose token is restored from `token_store`.
    ///
    /// The session starts locked and uninitialized; call `check_status` to
    /// refine it. A token store that cannot be read is treated as empty.
    pub async fn restore(
        auth_service: Arc<dyn RemoteAuthService>,
        token_store: Arc<dyn TokenStore>,
    ) -> Self {
        let token = match token_store.get_token().await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "Failed to read persisted token; starting without one");
                None
            }
        };
        debug!(has_token = token.is_some(), "Session restored");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            session: RwLock::new(Session::restored(token)),
            auth_service,
            token_store,
            events,
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.read().initialized
    }

    pub fn is_locked(&self) -> bool {
        self.read().locked
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    pub fn state(&self) -> SessionState {
        self.read().state()
    }

    /// Subscribes to session change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ============================================================================
    // Operations
    // ============================================================================

    /// Refreshes `initialized` and `locked` from the server.
    ///
    /// Safe to call at any time: any failure leaves the session as it was
    /// and yields `None`.
    pub async fn check_status(&self) -> Option<SystemStatus> {
        match self.auth_service.get_status().await {
            Ok(status) => {
                let state = {
                    let mut session = self.write();
                    session.initialized = status.initialized;
                    session.locked = status.locked;
                    session.state()
                };
                debug!(%state, "Session status refreshed");
                self.publish(SessionEvent::StatusRefreshed { state });
                Some(status)
            }
            Err(err) => {
                warn!(error = %err, "Status check failed; keeping current session state");
                None
            }
        }
    }

    /// Sets the master password for the first time.
    ///
    /// Does not touch the session; follow with `check_status` or `login`.
    pub async fn setup(&self, password: &str, confirm_password: &str) -> Result<()> {
        self.auth_service.setup(password, confirm_password).await?;
        info!("Vault master password set up");
        Ok(())
    }

    /// Unlocks the vault with the master password.
    ///
    /// The token is persisted before the session is updated, so a failed
    /// write leaves both the session and the slot untouched. Success also
    /// marks the vault initialized.
    pub async fn login(&self, password: &str) -> Result<LoginResponse> {
        let response = self.auth_service.login(password).await?;
        self.token_store.set_token(&response.token).await?;

        {
            let mut session = self.write();
            session.token = Some(response.token.clone());
            session.locked = false;
            // Only an initialized vault accepts a master password.
            session.initialized = true;
        }

        info!(expires_in = response.expires_in_seconds, "Vault unlocked");
        self.publish(SessionEvent::LoggedIn);
        Ok(response)
    }

    /// Discards the token. Never fails.
    ///
    /// The server is told first (it needs the token to invalidate it), then
    /// the local session and the persisted slot are cleared whatever the
    /// outcome.
    pub async fn logout(&self) {
        best_effort("logout", self.auth_service.logout()).await;

        {
            let mut session = self.write();
            session.token = None;
            session.locked = true;
        }
        best_effort("clear persisted token", self.token_store.clear_token()).await;

        info!("Logged out");
        self.publish(SessionEvent::LoggedOut);
    }

    /// Locks the vault, keeping the token. Never fails.
    pub async fn lock(&self) {
        best_effort("lock", self.auth_service.lock()).await;

        self.write().locked = true;

        info!("Vault locked");
        self.publish(SessionEvent::Locked);
    }

    /// Replaces the master password. The session is left as it is.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        self.auth_service
            .change_password(current_password, new_password, confirm_password)
            .await?;
        info!("Master password changed");
        Ok(())
    }

    // ============================================================================
    // Internal helpers
    // ============================================================================

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockAuthService, MockTokenStore};
    use std::sync::atomic::Ordering;
    use vaultdesk_core::VaultError;

    async fn controller(
        auth: Arc<MockAuthService>,
        store: Arc<MockTokenStore>,
    ) -> SessionController {
        SessionController::restore(auth, store).await
    }

    #[tokio::test]
    async fn test_initial_state() {
        let ctl = controller(
            Arc::new(MockAuthService::new()),
            Arc::new(MockTokenStore::default()),
        )
        .await;

        assert!(ctl.token().is_none());
        assert!(!ctl.is_initialized());
        assert!(ctl.is_locked());
        assert!(!ctl.is_authenticated());
        assert_eq!(ctl.state(), SessionState::Uninitialized);
    }

    #[tokio::test]
    async fn test_restore_reads_persisted_token_but_stays_locked() {
        let ctl = controller(
            Arc::new(MockAuthService::new()),
            Arc::new(MockTokenStore::with_token("persisted")),
        )
        .await;

        assert_eq!(ctl.token().as_deref(), Some("persisted"));
        assert!(!ctl.is_authenticated());
    }

    #[tokio::test]
    async fn test_check_status_assigns_fields() {
        let auth = Arc::new(MockAuthService::new());
        *auth.status.lock().unwrap() = Ok(SystemStatus {
            initialized: true,
            locked: false,
        });
        let ctl = controller(auth, Arc::new(MockTokenStore::with_token("tok"))).await;

        let status = ctl.check_status().await;

        assert_eq!(
            status,
            Some(SystemStatus {
                initialized: true,
                locked: false
            })
        );
        assert!(ctl.is_initialized());
        assert!(!ctl.is_locked());
        assert_eq!(ctl.state(), SessionState::Unlocked);
    }

    #[tokio::test]
    async fn test_check_status_failure_keeps_known_good_state() {
        let auth = Arc::new(MockAuthService::new());
        let ctl = controller(auth.clone(), Arc::new(MockTokenStore::default())).await;
        assert!(ctl.check_status().await.is_some());
        let before = ctl.snapshot();

        *auth.status.lock().unwrap() = Err(VaultError::transport("Network error"));
        let result = ctl.check_status().await;

        assert!(result.is_none());
        assert_eq!(ctl.snapshot(), before);
    }

    #[tokio::test]
    async fn test_setup_forwards_and_does_not_mutate() {
        let auth = Arc::new(MockAuthService::new());
        let ctl = controller(auth.clone(), Arc::new(MockTokenStore::default())).await;
        let before = ctl.snapshot();

        ctl.setup("Password123", "Password123").await.unwrap();

        assert!(auth.calls().contains(&"setup:Password123:Password123".to_string()));
        assert_eq!(ctl.snapshot(), before);
    }

    #[tokio::test]
    async fn test_setup_error_propagates() {
        let auth = Arc::new(MockAuthService::new());
        *auth.setup_result.lock().unwrap() = Err(VaultError::validation("Passwords do not match"));
        let ctl = controller(auth, Arc::new(MockTokenStore::default())).await;

        let err = ctl.setup("Password123", "Password124").await.unwrap_err();

        assert_eq!(err.user_message(), "Passwords do not match");
    }

    #[tokio::test]
    async fn test_login_success_authenticates_and_persists() {
        let store = Arc::new(MockTokenStore::default());
        let ctl = controller(Arc::new(MockAuthService::new()), store.clone()).await;
        let mut events = ctl.subscribe();

        let response = ctl.login("Password123").await.unwrap();

        assert!(ctl.is_authenticated());
        assert_eq!(ctl.token().as_deref(), Some("test-jwt-token"));
        assert_eq!(store.current(), Some(response.token));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedIn);
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_untouched() {
        let auth = Arc::new(MockAuthService::new());
        *auth.login_result.lock().unwrap() = Err(VaultError::unauthorized("Invalid password"));
        let store = Arc::new(MockTokenStore::with_token("old"));
        let ctl = controller(auth, store.clone()).await;
        let before = ctl.snapshot();

        let err = ctl.login("wrong").await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(ctl.snapshot(), before);
        assert_eq!(store.current().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_login_with_unwritable_store_does_not_unlock() {
        let store = Arc::new(MockTokenStore::default());
        store.fail_writes.store(true, Ordering::SeqCst);
        let ctl = controller(Arc::new(MockAuthService::new()), store).await;

        assert!(ctl.login("Password123").await.is_err());
        assert!(!ctl.is_authenticated());
        assert!(ctl.token().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let store = Arc::new(MockTokenStore::default());
        let ctl = controller(Arc::new(MockAuthService::new()), store.clone()).await;
        ctl.login("Password123").await.unwrap();

        ctl.logout().await;

        assert!(ctl.token().is_none());
        assert!(ctl.is_locked());
        assert!(!ctl.is_authenticated());
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_logout_with_failing_remote_still_logs_out() {
        let auth = Arc::new(MockAuthService::failing_best_effort());
        let store = Arc::new(MockTokenStore::default());
        let ctl = controller(auth.clone(), store.clone()).await;
        ctl.login("Password123").await.unwrap();

        ctl.logout().await;

        assert!(auth.calls().contains(&"logout".to_string()));
        assert!(ctl.token().is_none());
        assert!(!ctl.is_authenticated());
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_logout_with_unwritable_store_still_clears_session() {
        let store = Arc::new(MockTokenStore::default());
        let ctl = controller(Arc::new(MockAuthService::new()), store.clone()).await;
        ctl.login("Password123").await.unwrap();
        store.fail_writes.store(true, Ordering::SeqCst);

        ctl.logout().await;

        assert!(ctl.token().is_none());
        assert!(!ctl.is_authenticated());
    }

    #[tokio::test]
    async fn test_lock_keeps_token() {
        let auth = Arc::new(MockAuthService::failing_best_effort());
        let store = Arc::new(MockTokenStore::default());
        let ctl = controller(auth, store.clone()).await;
        ctl.login("Password123").await.unwrap();
        let mut events = ctl.subscribe();

        ctl.lock().await;

        assert!(ctl.is_locked());
        assert!(!ctl.is_authenticated());
        assert_eq!(ctl.token().as_deref(), Some("test-jwt-token"));
        assert_eq!(store.current().as_deref(), Some("test-jwt-token"));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Locked);
    }

    #[tokio::test]
    async fn test_lock_and_logout_sequences_never_leave_authenticated() {
        let auth = Arc::new(MockAuthService::new());
        let ctl = controller(auth.clone(), Arc::new(MockTokenStore::default())).await;

        // (fail_remote, use_logout) combinations, each preceded by a login.
        let steps = [(false, false), (true, false), (false, true), (true, true)];
        for (fail_remote, use_logout) in steps {
            ctl.login("Password123").await.unwrap();
            assert!(ctl.is_authenticated());

            auth.fail_lock.store(fail_remote, Ordering::SeqCst);
            auth.fail_logout.store(fail_remote, Ordering::SeqCst);
            if use_logout {
                ctl.logout().await;
            } else {
                ctl.lock().await;
            }
            assert!(!ctl.is_authenticated());

            // Repeated calls stay on the safe side.
            ctl.lock().await;
            ctl.logout().await;
            assert!(!ctl.is_authenticated());
        }
    }

    #[tokio::test]
    async fn test_login_then_lock_without_status_check_is_locked() {
        let ctl = controller(
            Arc::new(MockAuthService::new()),
            Arc::new(MockTokenStore::default()),
        )
        .await;

        ctl.login("Password123").await.unwrap();
        assert!(ctl.is_initialized());
        assert_eq!(ctl.state(), SessionState::Unlocked);

        ctl.lock().await;
        assert_eq!(ctl.state(), SessionState::Locked);

        ctl.logout().await;
        assert_eq!(ctl.state(), SessionState::Locked);
    }

    #[tokio::test]
    async fn test_locked_session_can_be_revived_by_login() {
        let ctl = controller(
            Arc::new(MockAuthService::new()),
            Arc::new(MockTokenStore::default()),
        )
        .await;
        ctl.login("Password123").await.unwrap();
        ctl.lock().await;

        ctl.login("Password123").await.unwrap();

        assert!(ctl.is_authenticated());
    }

    #[tokio::test]
    async fn test_change_password_propagates_validation() {
        let ctl = controller(
            Arc::new(MockAuthService::new()),
            Arc::new(MockTokenStore::default()),
        )
        .await;

        let err = ctl
            .change_password("wrong", "NewPassword1", "NewPassword1")
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(ctl.change_password("Password123", "NewPassword1", "NewPassword1").await.is_ok());
    }
}
