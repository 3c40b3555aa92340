//! Layered settings loader
//!
//! Precedence (low to high):
//! 1. Built-in defaults
//! 2. YAML settings file (when given)
//! 3. Environment variables (`BACKUP_DIR`, `KEEP_COUNT`, `BACKUP_HOUR`,
//!    `STOREKEEP_*`)
//! 4. CLI flags (handled by caller)

use super::settings::Settings;
use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use std::fs;
use tracing::debug;

/// Loads [`Settings`] from defaults, an optional file and the environment
#[derive(Debug, Default)]
pub struct SettingsLoader {
    file: Option<Utf8PathBuf>,
}

impl SettingsLoader {
    /// Create a loader that only uses defaults and the environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the given YAML file on top of the defaults
    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Resolve settings
    pub fn load(&self) -> Result<Settings> {
        let mut settings = match &self.file {
            Some(path) => Self::load_yaml_file(path)?,
            None => Settings::default(),
        };

        settings = Self::apply_env_overrides(settings)?;
        Self::validate(&settings)?;

        Ok(settings)
    }

    fn load_yaml_file(path: &Utf8Path) -> Result<Settings> {
        debug!("Loading settings from {}", path);
        let content = fs::read_to_string(path).map_err(|e| {
            Error::invalid_config(format!("Failed to read settings file {}: {}", path, e))
        })?;
        let settings: Settings = serde_yaml_ng::from_str(&content)?;
        Ok(settings)
    }

    fn apply_env_overrides(mut settings: Settings) -> Result<Settings> {
        if let Ok(val) = env::var("BACKUP_DIR") {
            settings.backup_dir = Utf8PathBuf::from(val);
        }

        if let Ok(val) = env::var("KEEP_COUNT") {
            settings.keep_count = val
                .parse()
                .map_err(|_| Error::invalid_config("KEEP_COUNT must be a valid number"))?;
        }

        if let Ok(val) = env::var("BACKUP_HOUR") {
            settings.backup_hour = val
                .parse()
                .map_err(|_| Error::invalid_config("BACKUP_HOUR must be a valid number"))?;
        }

        if let Ok(val) = env::var("STOREKEEP_DATA_DIR") {
            settings.data_dir = Utf8PathBuf::from(val);
        }

        if let Ok(val) = env::var("STOREKEEP_DATABASE") {
            settings.database = val;
        }

        if let Ok(val) = env::var("STOREKEEP_BIND") {
            settings.bind = val;
        }

        if let Ok(val) = env::var("STOREKEEP_ADMIN_TOKEN") {
            if !val.is_empty() {
                settings.admin_token = Some(val);
            }
        }

        Ok(settings)
    }

    /// Check values that serde cannot constrain
    pub fn validate(settings: &Settings) -> Result<()> {
        if settings.backup_hour > 23 {
            return Err(Error::invalid_config(format!(
                "backup hour must be between 0 and 23, got {}",
                settings.backup_hour
            )));
        }
        Ok(())
    }
}
