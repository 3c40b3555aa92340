use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storekeep_backup::{BackupCreated, BackupEntry, PerCollection, SnapshotMetadata};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRequest {
    pub backup_path: Option<String>,
    #[serde(default)]
    pub clear_before_restore: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanRequest {
    pub keep_count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub path: String,
    pub size: String,
}

impl CreatedResponse {
    pub fn new(message: &'static str, created: &BackupCreated) -> Self {
        Self {
            success: true,
            message,
            path: created.path.to_string(),
            size: storekeep_backup::human_bytes(created.size_bytes),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupItem {
    pub filename: String,
    pub path: String,
    pub size: String,
    pub size_bytes: u64,
    pub created: DateTime<Utc>,
    /// `null` when the file could not be read as a snapshot
    pub metadata: Option<SnapshotMetadata>,
}

impl From<BackupEntry> for BackupItem {
    fn from(entry: BackupEntry) -> Self {
        let (file, metadata) = match entry {
            BackupEntry::WithMetadata { file, metadata } => (file, Some(metadata)),
            BackupEntry::Unparsed { file } => (file, None),
        };
        Self {
            filename: file.filename,
            path: file.path.into_string(),
            size: file.size_label,
            size_bytes: file.size_bytes,
            created: file.created,
            metadata,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub backups: Vec<BackupItem>,
}

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub success: bool,
    pub message: &'static str,
    pub results: PerCollection<u64>,
}

#[derive(Debug, Serialize)]
pub struct CleanResponse {
    pub success: bool,
    pub deleted: usize,
}
