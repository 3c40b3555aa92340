//! Runtime settings for backup, storage and the HTTP surface

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Resolved storekeep settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Directory backups are written to and listed from
    #[serde(default = "default_backup_dir")]
    pub backup_dir: Utf8PathBuf,

    /// Default number of backups kept by `clean` and `auto`
    #[serde(default = "default_keep_count")]
    pub keep_count: usize,

    /// Number of backups kept by the daily scheduled run
    #[serde(default = "default_scheduled_keep_count")]
    pub scheduled_keep_count: usize,

    /// Local hour of day (0-23) of the scheduled run
    #[serde(default = "default_backup_hour")]
    pub backup_hour: u32,

    /// Directory holding the JSON document store
    #[serde(default = "default_data_dir")]
    pub data_dir: Utf8PathBuf,

    /// Name recorded as the source database in snapshots
    #[serde(default = "default_database")]
    pub database: String,

    /// Listen address for `serve`
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Bearer token required by the admin backup routes
    #[serde(default)]
    pub admin_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backup_dir: default_backup_dir(),
            keep_count: default_keep_count(),
            scheduled_keep_count: default_scheduled_keep_count(),
            backup_hour: default_backup_hour(),
            data_dir: default_data_dir(),
            database: default_database(),
            bind: default_bind(),
            admin_token: None,
        }
    }
}

fn default_backup_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("./backups")
}
fn default_keep_count() -> usize {
    5
}
fn default_scheduled_keep_count() -> usize {
    7
}
fn default_backup_hour() -> u32 {
    2
}
fn default_data_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("./data")
}
fn default_database() -> String {
    "storefront".to_string()
}
fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}
