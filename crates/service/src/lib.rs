//! Storage layer for saved HTTP requests and their collections.
//! - One JSON file holds the whole store; every write replaces it atomically.
//! - `Storage` is the facade: one reader/writer lock, copy-out results, rollback on failed saves.

pub mod errors;
pub mod storage;
#[cfg(test)]
pub mod test_support;

pub use errors::StorageError;
pub use storage::persistence::{JsonFilePersistence, Persistence};
pub use storage::Storage;
