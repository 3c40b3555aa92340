//! Backup directory listing.

use crate::snapshot::{SnapshotHeader, SnapshotMetadata, FILENAME_EXTENSION};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::Metadata;
use std::io::ErrorKind;
use storekeep_core::Result;
use tokio::fs;
use tracing::{debug, warn};

/// File-level facts about a backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupFile {
    pub filename: String,
    pub path: Utf8PathBuf,
    pub size_bytes: u64,
    pub size_label: String,
    /// Filesystem birth time, or modification time where birth time is unsupported
    pub created: DateTime<Utc>,
}

/// A listed backup, with or without a readable snapshot header.
#[derive(Debug, Clone, PartialEq)]
pub enum BackupEntry {
    WithMetadata {
        file: BackupFile,
        metadata: SnapshotMetadata,
    },
    Unparsed {
        file: BackupFile,
    },
}

impl BackupEntry {
    pub fn file(&self) -> &BackupFile {
        match self {
            Self::WithMetadata { file, .. } | Self::Unparsed { file } => file,
        }
    }

    pub fn metadata(&self) -> Option<&SnapshotMetadata> {
        match self {
            Self::WithMetadata { metadata, .. } => Some(metadata),
            Self::Unparsed { .. } => None,
        }
    }

    pub fn filename(&self) -> &str {
        &self.file().filename
    }

    pub fn path(&self) -> &Utf8Path {
        &self.file().path
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.file().created
    }
}

/// Lists every `*.json` file directly under `directory`, in enumeration order.
///
/// A missing directory yields an empty list. Files that cannot be read back
/// as a snapshot are returned as [`BackupEntry::Unparsed`].
pub async fn list_backups(directory: &Utf8Path) -> Result<Vec<BackupEntry>> {
    let mut read_dir = match fs::read_dir(directory).await {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Backup directory {} does not exist", directory);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    while let Some(dir_entry) = read_dir.next_entry().await? {
        let name = dir_entry.file_name();
        let Some(filename) = name.to_str() else {
            warn!("Skipping non UTF-8 file name in {}: {:?}", directory, name);
            continue;
        };
        if !filename.ends_with(FILENAME_EXTENSION) {
            continue;
        }

        let path = directory.join(filename);
        let stat = fs::metadata(&path).await?;
        let file = BackupFile {
            filename: filename.to_string(),
            path: path.clone(),
            size_bytes: stat.len(),
            size_label: human_bytes(stat.len()),
            created: created_time(&stat)?,
        };

        match read_metadata(&path).await {
            Ok(metadata) => entries.push(BackupEntry::WithMetadata { file, metadata }),
            Err(reason) => {
                warn!("Could not read metadata from {}: {}", path, reason);
                entries.push(BackupEntry::Unparsed { file });
            }
        }
    }

    Ok(entries)
}

async fn read_metadata(path: &Utf8Path) -> std::result::Result<SnapshotMetadata, String> {
    let content = fs::read(path).await.map_err(|e| e.to_string())?;
    let header: SnapshotHeader = serde_json::from_slice(&content).map_err(|e| e.to_string())?;
    Ok(header.metadata)
}

fn created_time(stat: &Metadata) -> Result<DateTime<Utc>> {
    let time = stat.created().or_else(|_| stat.modified())?;
    Ok(DateTime::<Utc>::from(time))
}

/// Formats bytes as a human-readable string.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
