use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("collection not found: {0}")]
    CollectionNotFound(String),
    #[error("collection is not empty: {0}")]
    CollectionNotEmpty(String),
    #[error("request not found: {0}")]
    RequestNotFound(String),
    #[error("invalid request: {0}")]
    Model(#[from] ModelError),
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("config directory: {0}")]
    ConfigDir(#[from] common::env::EnvError),
}

impl StorageError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CollectionNotFound(_) | Self::RequestNotFound(_))
    }

    /// Failures of the disk or codec, as opposed to domain rule violations.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Serialization(_))
    }
}
