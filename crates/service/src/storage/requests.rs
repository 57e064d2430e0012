use chrono::Utc;
use tracing::{info, instrument};

use models::store::insert_at;
use models::{Request, Store};

use crate::errors::StorageError;
use crate::storage::persistence::Persistence;
use crate::storage::Storage;

fn ensure_collection(store: &Store, collection_id: &str) -> Result<(), StorageError> {
    if collection_id.is_empty() || store.has_collection(collection_id) {
        Ok(())
    } else {
        Err(StorageError::CollectionNotFound(collection_id.to_string()))
    }
}

impl<P: Persistence> Storage<P> {
    /// Upsert a request and return the stored copy.
    ///
    /// An empty `id` creates a new entry with a generated id; a non-empty one replaces the
    /// existing entry, keeping its `created_at`. `request` itself is never modified.
    #[instrument(skip(self, request), fields(request_id = %request.id))]
    pub fn save_request(&self, request: &Request) -> Result<Request, StorageError> {
        request.validate()?;

        let mut store = self.write();
        let now = Utc::now();
        let mut saved = request.clone();

        if request.id.is_empty() {
            ensure_collection(&store, &request.collection_id)?;
            saved.id = models::new_id();
            saved.created_at = now;
            saved.updated_at = now;
            store.requests.push(saved.clone());
            self.commit(&mut store, |s| {
                s.requests.pop();
            })?;
            info!(request_id = %saved.id, "request created");
            return Ok(saved);
        }

        let idx = store.request_index(&request.id).ok_or_else(|| StorageError::RequestNotFound(request.id.clone()))?;
        ensure_collection(&store, &request.collection_id)?;
        saved.created_at = store.requests[idx].created_at;
        saved.updated_at = now;
        let previous = std::mem::replace(&mut store.requests[idx], saved.clone());
        self.commit(&mut store, move |s| s.requests[idx] = previous)?;
        Ok(saved)
    }

    pub fn get_request(&self, id: &str) -> Result<Request, StorageError> {
        self.read()
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StorageError::RequestNotFound(id.to_string()))
    }

    pub fn list_requests(&self) -> Vec<Request> {
        self.read().requests.clone()
    }

    /// Requests in `collection_id`, in store order. `""` selects uncategorized requests.
    pub fn list_requests_by_collection(&self, collection_id: &str) -> Vec<Request> {
        self.read().requests_in(collection_id).cloned().collect()
    }

    #[instrument(skip(self))]
    pub fn delete_request(&self, id: &str) -> Result<(), StorageError> {
        let mut store = self.write();
        let idx = store.request_index(id).ok_or_else(|| StorageError::RequestNotFound(id.to_string()))?;
        let removed = store.requests.remove(idx);
        self.commit(&mut store, move |s| insert_at(&mut s.requests, idx, removed))?;
        info!(request_id = %id, "request deleted");
        Ok(())
    }

    /// Reassign a request to `collection_id`, or make it uncategorized with `""`.
    #[instrument(skip(self))]
    pub fn move_request(&self, request_id: &str, collection_id: &str) -> Result<Request, StorageError> {
        let mut store = self.write();
        let idx = store
            .request_index(request_id)
            .ok_or_else(|| StorageError::RequestNotFound(request_id.to_string()))?;
        ensure_collection(&store, collection_id)?;

        let entry = &mut store.requests[idx];
        let previous_collection = std::mem::replace(&mut entry.collection_id, collection_id.to_string());
        let previous_updated_at = std::mem::replace(&mut entry.updated_at, Utc::now());
        self.commit(&mut store, move |s| {
            let entry = &mut s.requests[idx];
            entry.collection_id = previous_collection;
            entry.updated_at = previous_updated_at;
        })?;
        Ok(store.requests[idx].clone())
    }
}
