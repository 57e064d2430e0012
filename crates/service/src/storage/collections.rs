use tracing::{info, instrument};

use models::store::insert_at;
use models::Collection;

use crate::errors::StorageError;
use crate::storage::persistence::Persistence;
use crate::storage::Storage;

impl<P: Persistence> Storage<P> {
    #[instrument(skip(self))]
    pub fn create_collection(&self, name: &str) -> Result<Collection, StorageError> {
        let mut store = self.write();
        let collection = Collection::new(name);
        store.collections.push(collection.clone());
        self.commit(&mut store, |s| {
            s.collections.pop();
        })?;
        info!(collection_id = %collection.id, "collection created");
        Ok(collection)
    }

    pub fn get_collection(&self, id: &str) -> Result<Collection, StorageError> {
        self.read()
            .collections
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StorageError::CollectionNotFound(id.to_string()))
    }

    pub fn list_collections(&self) -> Vec<Collection> {
        self.read().collections.clone()
    }

    /// Rename; the name is not validated.
    #[instrument(skip(self))]
    pub fn update_collection(&self, id: &str, name: &str) -> Result<Collection, StorageError> {
        let mut store = self.write();
        let idx = store.collection_index(id).ok_or_else(|| StorageError::CollectionNotFound(id.to_string()))?;

        let previous = store.collections[idx].clone();
        store.collections[idx].rename(name);
        self.commit(&mut store, move |s| s.collections[idx] = previous)?;
        Ok(store.collections[idx].clone())
    }

    /// Delete a collection. Without `force` a collection that still holds requests is
    /// refused; with it, those requests are deleted too.
    #[instrument(skip(self))]
    pub fn delete_collection(&self, id: &str, force: bool) -> Result<(), StorageError> {
        let mut store = self.write();
        let idx = store.collection_index(id).ok_or_else(|| StorageError::CollectionNotFound(id.to_string()))?;
        if !force && store.has_requests_in(id) {
            return Err(StorageError::CollectionNotEmpty(id.to_string()));
        }

        let cascaded = if force { store.drain_requests_in(id) } else { Vec::new() };
        let cascaded_count = cascaded.len();
        let removed = store.collections.remove(idx);
        self.commit(&mut store, move |s| {
            insert_at(&mut s.collections, idx, removed);
            s.restore_requests(cascaded);
        })?;
        info!(collection_id = %id, cascaded = cascaded_count, "collection deleted");
        Ok(())
    }
}
