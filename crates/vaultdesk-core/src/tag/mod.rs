//! Tag domain module.

mod model;
mod service;

pub use model::{DEFAULT_TAG_COLOR, Tag, TagCreate, TagUpdate};
pub use service::RemoteTagService;
