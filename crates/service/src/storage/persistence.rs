use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use models::Store;

use crate::errors::StorageError;

/// Durable home of the whole `Store`.
///
/// Implementations write all-or-nothing: after `save` returns, the backing medium holds either
/// the previous document or the new one in full.
pub trait Persistence: Send + Sync {
    /// Location of the backing document, for diagnostics.
    fn path(&self) -> &Path;
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Store>, StorageError>;
    fn save(&self, store: &Store) -> Result<(), StorageError>;
}

/// Pretty-printed JSON document replaced by temp-file + fsync + rename.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    fn temp_prefix(&self) -> String {
        let name = self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        format!(".{name}.")
    }
}

impl Persistence for JsonFilePersistence {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Option<Store>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };
        let store = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "store loaded");
        Ok(Some(store))
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(store)?;
        let dir = self.dir();

        // Same directory as the target so the rename never crosses filesystems.
        // Dropping the handle on any early return deletes the temp file.
        let mut tmp = tempfile::Builder::new()
            .prefix(&self.temp_prefix())
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| StorageError::io(dir, e))?;
        tmp.write_all(&data).map_err(|e| StorageError::io(tmp.path(), e))?;
        tmp.flush().map_err(|e| StorageError::io(tmp.path(), e))?;
        tmp.as_file().sync_all().map_err(|e| StorageError::io(tmp.path(), e))?;
        tmp.persist(&self.path).map_err(|e| StorageError::io(&self.path, e.error))?;

        debug!(path = %self.path.display(), bytes = data.len(), "store saved");
        Ok(())
    }
}
