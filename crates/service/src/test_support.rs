#![cfg(test)]
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tempfile::TempDir;

use models::Store;

use crate::errors::StorageError;
use crate::storage::persistence::{JsonFilePersistence, Persistence};
use crate::storage::Storage;

/// JSON file persistence whose saves can be switched to fail.
pub struct FlakyPersistence {
    inner: JsonFilePersistence,
    failing: AtomicBool,
    saves: AtomicUsize,
}

impl FlakyPersistence {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { inner: JsonFilePersistence::new(path), failing: AtomicBool::new(false), saves: AtomicUsize::new(0) }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Persistence for FlakyPersistence {
    fn path(&self) -> &Path {
        self.inner.path()
    }

    fn load(&self) -> Result<Option<Store>, StorageError> {
        self.inner.load()
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::io(
                self.inner.path(),
                io::Error::new(io::ErrorKind::PermissionDenied, "injected save failure"),
            ));
        }
        self.inner.save(store)?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Fresh store in its own temp directory. Keep the `TempDir` alive for the test's duration.
pub fn temp_storage() -> (TempDir, Storage) {
    let tmp = tempfile::tempdir().expect("temp dir");
    let storage = Storage::open_in(tmp.path()).expect("open storage");
    (tmp, storage)
}

pub fn flaky_storage() -> (TempDir, Storage<FlakyPersistence>) {
    let tmp = tempfile::tempdir().expect("temp dir");
    let persistence = FlakyPersistence::new(tmp.path().join("requests.json"));
    let storage = Storage::with_persistence(persistence).expect("open storage");
    (tmp, storage)
}

pub fn get_request(name: &str) -> models::Request {
    models::Request::new(name, "GET", "http://localhost")
}
