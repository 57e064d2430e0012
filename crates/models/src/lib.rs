//! Entity and aggregate types for the saved-request store.
//! - `Collection` and `Request` are plain value types; cloning one yields an independent copy.
//! - `Store` is the aggregate persisted as a single JSON document.

pub mod errors;
pub mod collection;
pub mod request;
pub mod store;

pub use collection::Collection;
pub use request::{BodyType, Request};
pub use store::{Store, STORE_VERSION};

/// Fresh identifier for a newly created entity.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
