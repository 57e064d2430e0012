use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named grouping of saved requests. Names are not required to be unique.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// New collection with a generated id and both timestamps set to now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: crate::new_id(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }
}
