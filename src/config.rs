//! Application settings loaded from a TOML file.
//!
//! Lookup order for the settings file:
//! 1. `$SANELQUOTE_CONFIG`, if set
//! 2. `<config dir>/sanelquote/config.toml` (e.g. `~/.config/sanelquote/config.toml`)
//!
//! A missing file is not an error; every field has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::MaterialCatalog;
use crate::geometry::VolumeMethod;
use crate::intake::{IntakeLimits, MAX_UPLOAD_BYTES};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "SANELQUOTE_CONFIG";

const APP_DIR: &str = "sanelquote";
const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),
    #[error("cannot read config: {0}")]
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Settings {
    /// Material catalog to use instead of the built-in one.
    pub catalog_path: Option<PathBuf>,
    /// Upload size limit in MiB.
    pub max_upload_mb: u64,
    /// Volume estimate used for parsed STL files.
    pub volume_method: VolumeMethod,
    /// Directory for `sanelquote.log`; defaults to the OS data dir.
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            max_upload_mb: MAX_UPLOAD_BYTES / BYTES_PER_MB,
            volume_method: VolumeMethod::default(),
            log_dir: None,
        }
    }
}

impl Settings {
    /// Load from the standard location, falling back to defaults when no
    /// file exists there.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        parse(&text)
    }

    pub fn intake_limits(&self) -> IntakeLimits {
        IntakeLimits {
            max_bytes: self.max_upload_mb.saturating_mul(BYTES_PER_MB),
            volume_method: self.volume_method,
        }
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> Result<MaterialCatalog, crate::catalog::CatalogError> {
        match &self.catalog_path {
            Some(path) => MaterialCatalog::load(path),
            None => MaterialCatalog::builtin(),
        }
    }

    /// Where the log file goes.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| dirs::data_local_dir().unwrap_or_default().join(APP_DIR))
    }
}

/// `$SANELQUOTE_CONFIG`, else the per-user config file path.
pub fn default_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Parse a TOML string into [`Settings`], running validation.
pub fn parse(toml_str: &str) -> Result<Settings, ConfigError> {
    let settings: Settings =
        toml::from_str(toml_str).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    if settings.max_upload_mb == 0 {
        return Err(ConfigError::Invalid(
            "max_upload_mb must be at least 1".to_string(),
        ));
    }
    Ok(settings)
}
