use serde::Serialize;

use super::model::SessionState;

/// Notifications published by the session controller after each committed
/// change to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// `initialized`/`locked` were refreshed from the server.
    StatusRefreshed { state: SessionState },
    /// A login succeeded.
    LoggedIn,
    /// The vault was locked locally; the token is kept.
    Locked,
    /// The token was discarded.
    LoggedOut,
}
