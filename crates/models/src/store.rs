use serde::{Deserialize, Serialize};

use crate::{Collection, Request};

/// Schema tag written into every store file. Never interpreted on load.
pub const STORE_VERSION: u32 = 1;

fn default_version() -> u32 {
    STORE_VERSION
}

/// Aggregate root persisted as one JSON document.
///
/// Both sequences keep insertion order, which callers observe through list operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub requests: Vec<Request>,
}

impl Default for Store {
    fn default() -> Self {
        Self { version: STORE_VERSION, collections: Vec::new(), requests: Vec::new() }
    }
}

impl Store {
    pub fn collection_index(&self, id: &str) -> Option<usize> {
        self.collections.iter().position(|c| c.id == id)
    }

    pub fn request_index(&self, id: &str) -> Option<usize> {
        self.requests.iter().position(|r| r.id == id)
    }

    pub fn has_collection(&self, id: &str) -> bool {
        self.collection_index(id).is_some()
    }

    pub fn has_requests_in(&self, collection_id: &str) -> bool {
        self.requests.iter().any(|r| r.collection_id == collection_id)
    }

    /// Requests whose `collection_id` equals the argument, in store order.
    pub fn requests_in<'a>(&'a self, collection_id: &'a str) -> impl Iterator<Item = &'a Request> + 'a {
        self.requests.iter().filter(move |r| r.collection_id == collection_id)
    }

    /// Remove every request in `collection_id`, returning each with the index it held.
    ///
    /// Indices are positions in the sequence before any removal, ascending.
    pub fn drain_requests_in(&mut self, collection_id: &str) -> Vec<(usize, Request)> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.requests.len());
        for (idx, req) in std::mem::take(&mut self.requests).into_iter().enumerate() {
            if req.collection_id == collection_id {
                removed.push((idx, req));
            } else {
                kept.push(req);
            }
        }
        self.requests = kept;
        removed
    }

    /// Undo `drain_requests_in`: reinsert entries at their recorded positions.
    ///
    /// Entries must be sorted by ascending index, as returned by the drain.
    pub fn restore_requests(&mut self, removed: Vec<(usize, Request)>) {
        for (idx, req) in removed {
            insert_at(&mut self.requests, idx, req);
        }
    }
}

/// Insert keeping order; an index past the end appends.
pub fn insert_at<T>(items: &mut Vec<T>, idx: usize, item: T) {
    let idx = idx.min(items.len());
    items.insert(idx, item);
}
