//! Account collection and tag caches.
//!
//! # Module Structure
//!
//! - `store`: `AccountCollectionStore`, the filtered and paginated listing
//! - `tags`: `TagStore`, the tag list owned by the collection store
//! - `loading`: drop-guarded `loading` flag shared by both

mod loading;
mod store;
mod tags;

pub use store::{AccountCollectionStore, AccountListing};
pub use tags::TagStore;
