//! Session domain models.

use serde::{Deserialize, Serialize};

/// Local view of the vault session.
///
/// `authenticated` is never stored: it is derived from the token and the
/// lock flag so the two can never disagree.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// Bearer credential issued by the last successful login.
    pub token: Option<String>,
    /// Whether the vault has completed its one-time master password setup.
    pub initialized: bool,
    /// Whether the vault requires the master password before exposing data.
    pub locked: bool,
}

impl Session {
    /// Creates the start-of-process session: locked, not yet known to be
    /// initialized, carrying whatever token was restored from storage.
    pub fn restored(token: Option<String>) -> Self {
        Self {
            token,
            initialized: false,
            locked: true,
        }
    }

    /// `true` iff a token is held and the vault is not locked.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && !self.locked
    }

    /// Position of this session in the lifecycle state machine.
    pub fn state(&self) -> SessionState {
        if !self.initialized {
            SessionState::Uninitialized
        } else if self.is_authenticated() {
            SessionState::Unlocked
        } else {
            SessionState::Locked
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("initialized", &self.initialized)
            .field("locked", &self.locked)
            .finish()
    }
}

/// Lifecycle states of the vault session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    /// No master password has been set up yet.
    Uninitialized,
    /// Set up, but the master password must be entered.
    Locked,
    /// Account data may be read.
    Unlocked,
}

/// Vault status as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(rename = "is_initialized")]
    pub initialized: bool,
    #[serde(rename = "is_locked")]
    pub locked: bool,
}

/// Successful login answer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "access_token")]
    pub token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(rename = "expires_in")]
    pub expires_in_seconds: u64,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// Keeps the token out of logs and panic messages.
impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in_seconds", &self.expires_in_seconds)
            .finish()
    }
}
