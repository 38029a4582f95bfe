//! reqwest transport for the remote vault API.
//!
//! # Module Structure
//!
//! - `client`: `ApiClient` (base URL, timeout, bearer token, status mapping)
//! - `auth`: `HttpAuthService`
//! - `accounts`: `HttpAccountService`
//! - `tags`: `HttpTagService`

mod accounts;
mod auth;
mod client;
mod tags;

pub use accounts::HttpAccountService;
pub use auth::HttpAuthService;
pub use client::ApiClient;
pub use tags::HttpTagService;
