//! CLI command implementations

pub mod auto;
pub mod clean;
pub mod create;
pub mod list;
pub mod restore;
pub mod schedule;
pub mod serve;

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use storekeep_backup::{BackupManager, PerCollection};
use storekeep_core::config::SettingsLoader;
use storekeep_core::{JsonDirStore, Settings};
use tracing::{debug, info, warn};

use crate::output;

/// Flags shared by every subcommand
#[derive(Debug, Default)]
pub struct GlobalOptions {
    pub config: Option<Utf8PathBuf>,
    pub data_dir: Option<Utf8PathBuf>,
}

/// Resolved settings plus a manager bound to the configured data store
pub struct CommandContext {
    pub settings: Settings,
    pub manager: Arc<BackupManager>,
}

impl CommandContext {
    pub fn load(global: &GlobalOptions) -> Result<Self> {
        let settings = resolve_settings(global)?;
        debug!(
            "Using data store {} (database {})",
            settings.data_dir, settings.database
        );

        let store = Arc::new(JsonDirStore::new(
            settings.data_dir.clone(),
            settings.database.clone(),
        ));
        Ok(Self {
            settings,
            manager: Arc::new(BackupManager::new(store)),
        })
    }

    /// `--dir` when given, the configured backup directory otherwise
    pub fn backup_dir<'a>(&'a self, flag: Option<&'a Utf8Path>) -> &'a Utf8Path {
        flag.unwrap_or(self.settings.backup_dir.as_path())
    }
}

/// Defaults, settings file and environment, then global CLI flags
pub fn resolve_settings(global: &GlobalOptions) -> Result<Settings> {
    let mut loader = SettingsLoader::new();
    if let Some(path) = &global.config {
        loader = loader.with_file(path.clone());
    }

    let mut settings = loader.load().context("Failed to load settings")?;
    if let Some(data_dir) = &global.data_dir {
        settings.data_dir = data_dir.clone();
    }
    Ok(settings)
}

/// Print one `name: count` line per collection
pub fn print_collection_counts<T: std::fmt::Display>(counts: &PerCollection<T>) {
    for (collection, count) in counts.iter() {
        output::kv(collection.as_str(), &count.to_string());
    }
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
