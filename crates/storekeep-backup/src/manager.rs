//! Backup manager: create, restore, list, clean and auto-backup.
//!
//! Independent sub-steps (reading the five collections, inserting them,
//! deleting stale files) are issued together and joined with
//! `try_join_all`, so the first failure is returned and the remaining
//! futures are dropped. Nothing serializes one operation against another.

use crate::listing::{self, human_bytes, BackupEntry};
use crate::snapshot::{PerCollection, Snapshot, SnapshotData, SnapshotMetadata, SnapshotPayload};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use storekeep_core::{Collection, DataStore, Error, Result};
use tokio::fs;
use tracing::{debug, info};

/// Result of a successful create-backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupCreated {
    /// Full path of the written snapshot
    pub path: Utf8PathBuf,

    /// Size reported by the filesystem after the write
    pub size_bytes: u64,

    /// Header written into the snapshot
    pub metadata: SnapshotMetadata,
}

/// Records inserted per collection by a restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreSummary {
    pub inserted: PerCollection<u64>,
}

impl RestoreSummary {
    pub fn total(&self) -> u64 {
        self.inserted.iter().map(|(_, n)| *n).sum()
    }
}

/// Sequences data store and filesystem calls for every backup operation.
pub struct BackupManager {
    store: Arc<dyn DataStore>,
}

impl BackupManager {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    /// Snapshots all collections into a new file under `directory`.
    pub async fn create_backup(&self, directory: &Utf8Path) -> Result<BackupCreated> {
        fs::create_dir_all(directory).await?;

        let store = &self.store;
        let reads = Collection::ALL.map(|collection| async move {
            let records = store.find_all(collection).await?;
            debug!("Read {} records from {}", records.len(), collection);
            Ok::<_, Error>((collection, records))
        });

        let mut data = SnapshotData::default();
        for (collection, records) in try_join_all(reads).await? {
            *data.get_mut(collection) = records;
        }

        let snapshot = Snapshot::new(Utc::now(), store.database_name(), data);
        let path = directory.join(snapshot.filename());

        fs::write(&path, snapshot.to_json_bytes()?).await?;
        let size_bytes = fs::metadata(&path).await?.len();

        info!("Backup created: {} ({})", path, human_bytes(size_bytes));

        Ok(BackupCreated {
            path,
            size_bytes,
            metadata: snapshot.metadata,
        })
    }

    /// Loads a snapshot file back into the store.
    ///
    /// With `clear_before_restore`, every collection is emptied first. Inserts
    /// are additive and run concurrently per collection; a failing insert is
    /// returned as the only error while other collections may already be
    /// populated.
    pub async fn restore_backup(
        &self,
        file_path: &Utf8Path,
        clear_before_restore: bool,
    ) -> Result<RestoreSummary> {
        info!(
            "Restoring backup: file={}, clear={}",
            file_path, clear_before_restore
        );

        let content = fs::read(file_path).await?;
        let payload = SnapshotPayload::from_json_bytes(&content)
            .map_err(|e| Error::invalid_snapshot(file_path.as_str(), e.to_string()))?;

        let store = &self.store;

        if clear_before_restore {
            let cleared = try_join_all(Collection::ALL.map(|c| store.delete_all(c))).await?;
            info!(
                "Cleared {} existing records",
                cleared.iter().sum::<u64>()
            );
        }

        let mut data = payload.into_data();
        let inserts = Collection::ALL
            .into_iter()
            .filter_map(|collection| {
                let records = std::mem::take(data.get_mut(collection));
                (!records.is_empty()).then_some((collection, records))
            })
            .map(|(collection, records)| async move {
                let inserted = store.insert_many(collection, records).await?;
                debug!("Inserted {} records into {}", inserted, collection);
                Ok::<_, Error>((collection, inserted))
            });

        let mut summary = RestoreSummary::default();
        for (collection, inserted) in try_join_all(inserts).await? {
            *summary.inserted.get_mut(collection) = inserted;
        }

        info!("Restore complete: {} records inserted", summary.total());
        Ok(summary)
    }

    /// Lists backups under `directory`; see [`listing::list_backups`].
    pub async fn list_backups(&self, directory: &Utf8Path) -> Result<Vec<BackupEntry>> {
        listing::list_backups(directory).await
    }

    /// Deletes all but the `keep_count` most recently created backups.
    ///
    /// Returns the number of files deleted.
    pub async fn clean_old_backups(&self, keep_count: usize, directory: &Utf8Path) -> Result<usize> {
        let mut backups = listing::list_backups(directory).await?;

        if backups.len() <= keep_count {
            debug!(
                "Found {} backups, keeping up to {}, no cleanup needed",
                backups.len(),
                keep_count
            );
            return Ok(0);
        }

        backups.sort_by(|a, b| b.created().cmp(&a.created()));
        let stale = backups.split_off(keep_count);

        try_join_all(stale.iter().map(|entry| async move {
            fs::remove_file(entry.path()).await?;
            info!("Removed old backup: {}", entry.filename());
            Ok::<_, Error>(())
        }))
        .await?;

        info!(
            "Cleanup completed: kept {} backups, removed {}",
            keep_count,
            stale.len()
        );
        Ok(stale.len())
    }

    /// Creates a backup, then prunes `directory` down to `keep_count` files.
    ///
    /// A failing prune still leaves the new backup on disk.
    pub async fn auto_backup(&self, directory: &Utf8Path, keep_count: usize) -> Result<BackupCreated> {
        let created = self.create_backup(directory).await?;
        self.clean_old_backups(keep_count, directory).await?;
        Ok(created)
    }
}
