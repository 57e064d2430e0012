use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_APP_NAME: &str = "reqvault";
pub const DEFAULT_FILE_NAME: &str = "requests.json";
pub const CONFIG_PATH_ENV: &str = "REQVAULT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "reqvault.toml";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Overrides the `$XDG_CONFIG_HOME` / `$HOME/.config` lookup.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_app_name() -> String { DEFAULT_APP_NAME.to_string() }
fn default_file_name() -> String { DEFAULT_FILE_NAME.to_string() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self { app_name: default_app_name(), file_name: default_file_name(), dir: None }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

/// Load from `$REQVAULT_CONFIG`, or `reqvault.toml` in the working directory.
/// A missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_optional(Path::new(&path))
}

pub fn load_optional(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(path)
}

pub fn load_from_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize();
        self.storage.validate()?;
        Ok(())
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.app_name.trim().is_empty() {
            self.app_name = default_app_name();
        }
        if self.file_name.trim().is_empty() {
            self.file_name = default_file_name();
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("storage.app_name", &self.app_name), ("storage.file_name", &self.file_name)] {
            if value == "." || value == ".." || value.contains('/') || value.contains('\\') {
                return Err(anyhow!("{field} must be a single path component, got {value:?}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.storage.app_name, "reqvault");
        assert_eq!(cfg.storage.file_name, "requests.json");
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn parses_all_sections() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [storage]
            app_name = "other"
            dir = "/var/lib/reqvault"

            [logging]
            format = "json"
            filter = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.storage.app_name, "other");
        assert_eq!(cfg.storage.file_name, "requests.json");
        assert_eq!(cfg.storage.dir, Some(PathBuf::from("/var/lib/reqvault")));
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.filter.as_deref(), Some("debug"));
    }

    #[test]
    fn blank_names_are_normalized() {
        let mut cfg = AppConfig {
            storage: StorageConfig { app_name: "  ".into(), file_name: "".into(), dir: None },
            ..AppConfig::default()
        };
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.storage, StorageConfig::default());
    }

    #[test]
    fn path_like_file_name_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.storage.file_name = "../escape.json".into();
        assert!(cfg.normalize_and_validate().is_err());
        cfg.storage.file_name = "..".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn missing_file_is_default_but_bad_file_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert_eq!(load_optional(&missing).unwrap(), AppConfig::default());

        let bad = tmp.path().join("bad.toml");
        std::fs::write(&bad, "[storage\napp_name = 1").unwrap();
        assert!(load_optional(&bad).is_err());
    }
}
