//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the local `Session`, its `SessionState`, and wire types
//! - `service`: `RemoteAuthService`, the server side of lock/unlock
//! - `token_store`: `TokenStore`, the persisted bearer token slot
//! - `event`: `SessionEvent` change notifications

mod event;
mod model;
mod service;
mod token_store;

pub use event::SessionEvent;
pub use model::{LoginResponse, Session, SessionState, SystemStatus};
pub use service::RemoteAuthService;
pub use token_store::TokenStore;
