//! Environment/runtime helpers
//!
//! Resolves the per-user configuration directory and makes sure it exists at startup.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("$HOME is not defined")]
    NoHomeDir,
    #[error("cannot create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// `$XDG_CONFIG_HOME/<app>` when set and non-empty, else `$HOME/.config/<app>`.
pub fn config_dir(app: &str) -> Result<PathBuf, EnvError> {
    resolve_config_dir(app, std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
}

/// Pure form of [`config_dir`]; empty variables count as unset.
pub fn resolve_config_dir(app: &str, xdg: Option<OsString>, home: Option<OsString>) -> Result<PathBuf, EnvError> {
    if let Some(xdg) = xdg.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(app));
    }
    match home.filter(|v| !v.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join(".config").join(app)),
        None => Err(EnvError::NoHomeDir),
    }
}

/// Create `path` and any missing parents.
pub fn ensure_dir(path: &Path) -> Result<(), EnvError> {
    std::fs::create_dir_all(path).map_err(|source| EnvError::CreateDir { path: path.to_path_buf(), source })?;
    debug!(dir = %path.display(), "config directory ready");
    Ok(())
}
