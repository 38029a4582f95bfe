//! In-memory collaborators for the store and controller tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use vaultdesk_core::account::{
    AccountCreate, AccountPage, AccountQuery, AccountRecord, AccountStats, AccountUpdate,
    BatchOutcome, RemoteAccountService, TagMode,
};
use vaultdesk_core::error::{Result, VaultError};
use vaultdesk_core::session::{LoginResponse, RemoteAuthService, SystemStatus, TokenStore};
use vaultdesk_core::tag::{RemoteTagService, Tag, TagCreate, TagUpdate};

pub fn account(id: &str, email: &str) -> AccountRecord {
    AccountRecord {
        id: id.to_string(),
        email: email.to_string(),
        note: None,
        sub2api: false,
        source: None,
        browser: None,
        gpt_membership: None,
        family_group: None,
        recovery_email: None,
        custom_fields: Default::default(),
        has_password: true,
        has_totp: false,
        tags: Vec::new(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

pub fn page_of(items: Vec<AccountRecord>, total: u64, page: u32, total_pages: u32) -> AccountPage {
    AccountPage {
        items,
        total,
        page,
        page_size: 20,
        total_pages,
    }
}

pub fn tag(id: &str, name: &str) -> Tag {
    Tag {
        id: id.to_string(),
        name: name.to_string(),
        color: "#6366f1".to_string(),
        created_at: None,
        account_count: Some(0),
    }
}

// ============================================================================
// Auth
// ============================================================================

pub struct MockAuthService {
    pub status: Mutex<Result<SystemStatus>>,
    pub login_result: Mutex<Result<LoginResponse>>,
    pub setup_result: Mutex<Result<()>>,
    pub fail_logout: AtomicBool,
    pub fail_lock: AtomicBool,
    pub calls: Mutex<Vec<String>>,
}

impl MockAuthService {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(Ok(SystemStatus {
                initialized: true,
                locked: true,
            })),
            login_result: Mutex::new(Ok(LoginResponse {
                token: "test-jwt-token".to_string(),
                token_type: "bearer".to_string(),
                expires_in_seconds: 3600,
            })),
            setup_result: Mutex::new(Ok(())),
            fail_logout: AtomicBool::new(false),
            fail_lock: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_best_effort() -> Self {
        let service = Self::new();
        service.fail_logout.store(true, Ordering::SeqCst);
        service.fail_lock.store(true, Ordering::SeqCst);
        service
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl RemoteAuthService for MockAuthService {
    async fn get_status(&self) -> Result<SystemStatus> {
        self.record("get_status");
        self.status.lock().unwrap().clone()
    }

    async fn setup(&self, password: &str, confirm_password: &str) -> Result<()> {
        self.record(format!("setup:{password}:{confirm_password}"));
        self.setup_result.lock().unwrap().clone()
    }

    async fn login(&self, _password: &str) -> Result<LoginResponse> {
        self.record("login");
        self.login_result.lock().unwrap().clone()
    }

    async fn logout(&self) -> Result<()> {
        self.record("logout");
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(VaultError::transport("server unreachable"));
        }
        Ok(())
    }

    async fn lock(&self) -> Result<()> {
        self.record("lock");
        if self.fail_lock.load(Ordering::SeqCst) {
            return Err(VaultError::unauthorized("token expired"));
        }
        Ok(())
    }

    async fn change_password(
        &self,
        current_password: &str,
        _new_password: &str,
        _confirm_password: &str,
    ) -> Result<()> {
        self.record("change_password");
        if current_password == "wrong" {
            return Err(VaultError::validation("Incorrect password"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MockTokenStore {
    pub token: Mutex<Option<String>>,
    pub fail_writes: AtomicBool,
}

impl MockTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn current(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.current())
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VaultError::io("disk full"));
        }
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn clear_token(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VaultError::io("read-only file system"));
        }
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// Account service double.
///
/// `list` pops a queued response per call (falling back to `default_page`)
/// and, when a gate is queued, waits for it before answering. The response
/// is chosen at call time so tests can control arrival order.
pub struct MockAccountService {
    pub list_responses: Mutex<VecDeque<Result<AccountPage>>>,
    pub default_page: Mutex<AccountPage>,
    pub list_gates: Mutex<VecDeque<Arc<Notify>>>,
    pub queries: Mutex<Vec<AccountQuery>>,
    pub update_result: Mutex<Option<Result<AccountRecord>>>,
    pub create_result: Mutex<Option<Result<AccountRecord>>>,
    pub delete_result: Mutex<Result<()>>,
    pub deletes: Mutex<Vec<(String, bool)>>,
    pub password: Mutex<Option<String>>,
    pub totp: Mutex<Option<String>>,
    pub sources: Mutex<Result<Vec<String>>>,
    pub stats: Mutex<Result<AccountStats>>,
    pub batch_result: Mutex<Result<BatchOutcome>>,
    pub batch_calls: Mutex<Vec<String>>,
}

impl MockAccountService {
    pub fn new() -> Self {
        Self {
            list_responses: Mutex::new(VecDeque::new()),
            default_page: Mutex::new(page_of(Vec::new(), 0, 1, 1)),
            list_gates: Mutex::new(VecDeque::new()),
            queries: Mutex::new(Vec::new()),
            update_result: Mutex::new(None),
            create_result: Mutex::new(None),
            delete_result: Mutex::new(Ok(())),
            deletes: Mutex::new(Vec::new()),
            password: Mutex::new(None),
            totp: Mutex::new(None),
            sources: Mutex::new(Ok(Vec::new())),
            stats: Mutex::new(Ok(AccountStats::default())),
            batch_result: Mutex::new(Ok(BatchOutcome::default())),
            batch_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push_list(&self, response: Result<AccountPage>) {
        self.list_responses.lock().unwrap().push_back(response);
    }

    pub fn set_default_page(&self, page: AccountPage) {
        *self.default_page.lock().unwrap() = page;
    }

    pub fn push_gate(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.list_gates.lock().unwrap().push_back(gate.clone());
        gate
    }

    pub fn queries(&self) -> Vec<AccountQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteAccountService for MockAccountService {
    async fn list(&self, query: &AccountQuery) -> Result<AccountPage> {
        self.queries.lock().unwrap().push(query.clone());
        let response = self
            .list_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_page.lock().unwrap().clone()));
        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        response
    }

    async fn get(&self, id: &str) -> Result<AccountRecord> {
        if id == "missing" {
            return Err(VaultError::not_found("account", id));
        }
        Ok(account(id, &format!("{id}@example.com")))
    }

    async fn get_password(&self, _id: &str) -> Result<Option<String>> {
        Ok(self.password.lock().unwrap().clone())
    }

    async fn get_totp(&self, _id: &str) -> Result<Option<String>> {
        Ok(self.totp.lock().unwrap().clone())
    }

    async fn create(&self, data: &AccountCreate) -> Result<AccountRecord> {
        self.create_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(account("new", &data.email)))
    }

    async fn update(&self, id: &str, data: &AccountUpdate) -> Result<AccountRecord> {
        if let Some(result) = self.update_result.lock().unwrap().take() {
            return result;
        }
        let mut record = account(id, &format!("{id}@example.com"));
        record.note = data.note.clone();
        Ok(record)
    }

    async fn delete(&self, id: &str, hard: bool) -> Result<()> {
        self.deletes.lock().unwrap().push((id.to_string(), hard));
        self.delete_result.lock().unwrap().clone()
    }

    async fn list_sources(&self) -> Result<Vec<String>> {
        self.sources.lock().unwrap().clone()
    }

    async fn get_stats(&self) -> Result<AccountStats> {
        self.stats.lock().unwrap().clone()
    }

    async fn batch_delete(&self, ids: &[String], hard: bool) -> Result<BatchOutcome> {
        self.batch_calls
            .lock()
            .unwrap()
            .push(format!("delete:{}:{hard}", ids.join(",")));
        self.batch_result.lock().unwrap().clone()
    }

    async fn batch_update_tags(
        &self,
        ids: &[String],
        tag_ids: &[String],
        mode: TagMode,
    ) -> Result<BatchOutcome> {
        self.batch_calls
            .lock()
            .unwrap()
            .push(format!("tags:{}:{}:{mode}", ids.join(","), tag_ids.join(",")));
        self.batch_result.lock().unwrap().clone()
    }

    async fn batch_update(&self, ids: &[String], _data: &AccountUpdate) -> Result<BatchOutcome> {
        self.batch_calls
            .lock()
            .unwrap()
            .push(format!("update:{}", ids.join(",")));
        self.batch_result.lock().unwrap().clone()
    }
}

// ============================================================================
// Tags
// ============================================================================

pub struct MockTagService {
    pub tags: Mutex<Result<Vec<Tag>>>,
    pub list_gate: Mutex<Option<Arc<Notify>>>,
    pub fail_mutations: AtomicBool,
}

impl MockTagService {
    pub fn new() -> Self {
        Self {
            tags: Mutex::new(Ok(Vec::new())),
            list_gate: Mutex::new(None),
            fail_mutations: AtomicBool::new(false),
        }
    }

    fn check_mutation(&self) -> Result<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(VaultError::validation("Tag name already exists"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteTagService for MockTagService {
    async fn list(&self) -> Result<Vec<Tag>> {
        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.tags.lock().unwrap().clone()
    }

    async fn get(&self, id: &str) -> Result<Tag> {
        Ok(tag(id, id))
    }

    async fn create(&self, data: &TagCreate) -> Result<Tag> {
        self.check_mutation()?;
        let mut created = tag("created", &data.name);
        if let Some(color) = &data.color {
            created.color = color.clone();
        }
        Ok(created)
    }

    async fn update(&self, id: &str, data: &TagUpdate) -> Result<Tag> {
        self.check_mutation()?;
        let mut updated = tag(id, data.name.as_deref().unwrap_or(id));
        if let Some(color) = &data.color {
            updated.color = color.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, _id: &str) -> Result<()> {
        self.check_mutation()
    }
}
