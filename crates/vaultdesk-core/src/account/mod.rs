//! Account domain module.
//!
//! # Module Structure
//!
//! - `model`: `AccountRecord`, write payloads, `AccountStats`
//! - `query`: `AccountFilters`, `AccountQuery`, `AccountPage`
//! - `batch`: `BatchOutcome`, `TagMode`
//! - `service`: `RemoteAccountService`
//! - `event`: `StoreEvent` change notifications

mod batch;
mod event;
mod model;
mod query;
mod service;

pub use batch::{BatchOutcome, TagMode};
pub use event::StoreEvent;
pub use model::{AccountCreate, AccountRecord, AccountStats, AccountUpdate};
pub use query::{AccountFilters, AccountPage, AccountQuery, DEFAULT_PAGE_SIZE};
pub use service::RemoteAccountService;
