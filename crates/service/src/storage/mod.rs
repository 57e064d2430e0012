//! Storage facade over the saved-request store.
//!
//! Every public method takes the store lock for its whole duration: shared for reads,
//! exclusive for writes. Writes mutate memory, save, and undo the mutation if the save
//! fails, so memory never drifts from the last durable state.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use configs::StorageConfig;
use models::Store;

use crate::errors::StorageError;
use persistence::{JsonFilePersistence, Persistence};

pub mod collections;
pub mod persistence;
pub mod requests;

pub struct Storage<P: Persistence = JsonFilePersistence> {
    store: RwLock<Store>,
    persistence: P,
}

impl Storage<JsonFilePersistence> {
    /// Open the default store under `$XDG_CONFIG_HOME/reqvault` or `$HOME/.config/reqvault`.
    pub fn new() -> Result<Self, StorageError> {
        Self::from_config(&StorageConfig::default())
    }

    pub fn from_config(cfg: &StorageConfig) -> Result<Self, StorageError> {
        let dir = match &cfg.dir {
            Some(dir) => dir.clone(),
            None => common::env::config_dir(&cfg.app_name)?,
        };
        Self::open_file(dir, &cfg.file_name)
    }

    /// Open `requests.json` inside `dir`, creating the directory if needed.
    pub fn open_in<D: Into<PathBuf>>(dir: D) -> Result<Self, StorageError> {
        Self::open_file(dir.into(), configs::DEFAULT_FILE_NAME)
    }

    fn open_file(dir: PathBuf, file_name: &str) -> Result<Self, StorageError> {
        common::env::ensure_dir(&dir)?;
        Self::with_persistence(JsonFilePersistence::new(dir.join(file_name)))
    }
}

impl<P: Persistence> Storage<P> {
    /// Load whatever `persistence` holds; an absent document starts an empty store.
    pub fn with_persistence(persistence: P) -> Result<Self, StorageError> {
        let store = persistence.load()?.unwrap_or_default();
        info!(
            path = %persistence.path().display(),
            collections = store.collections.len(),
            requests = store.requests.len(),
            "storage opened"
        );
        Ok(Self { store: RwLock::new(store), persistence })
    }

    pub fn path(&self) -> &Path {
        self.persistence.path()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Schema tag of the loaded document.
    pub fn version(&self) -> u32 {
        self.read().version
    }

    /// Deep copy of the entire store.
    pub fn snapshot(&self) -> Store {
        self.read().clone()
    }

    // A poisoned lock still guards a consistent store: every writer undoes its
    // mutation before returning, and none of them panic between mutate and undo.
    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Save `store`; on failure apply `undo` to it before handing the error back.
    fn commit<F>(&self, store: &mut Store, undo: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Store),
    {
        if let Err(err) = self.persistence.save(store) {
            undo(store);
            warn!(path = %self.path().display(), error = %err, "save failed, in-memory change rolled back");
            return Err(err);
        }
        Ok(())
    }
}
