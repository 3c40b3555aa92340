//! Common test infrastructure for storekeep-backup tests
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use storekeep_backup::BackupManager;
use storekeep_core::{Collection, DataStore, Error, MemoryStore, Record, Result};
use tempfile::TempDir;

/// Pause long enough for consecutive files to get distinct creation times
/// and distinct millisecond timestamps.
pub const FILE_GAP: Duration = Duration::from_millis(25);

pub struct TestEnv {
    pub temp: TempDir,
    pub backup_dir: Utf8PathBuf,
    pub store: Arc<MemoryStore>,
    pub manager: BackupManager,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let backup_dir =
            Utf8PathBuf::from_path_buf(temp.path().join("backups")).expect("valid UTF-8");
        let store = Arc::new(MemoryStore::new("storefront"));
        let manager = BackupManager::new(store.clone());
        Self {
            temp,
            backup_dir,
            store,
            manager,
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.backup_dir
    }

    pub async fn seed(&self, collection: Collection, count: usize) -> Vec<Record> {
        let records = sample_records(collection, count);
        self.store
            .insert_many(collection, records.clone())
            .await
            .unwrap();
        records
    }

    pub async fn all(&self, collection: Collection) -> Vec<Record> {
        self.store.find_all(collection).await.unwrap()
    }

    pub async fn count(&self, collection: Collection) -> u64 {
        self.store.count(collection, None).await.unwrap()
    }

    pub async fn clear_store(&self) {
        for collection in Collection::ALL {
            self.store.delete_all(collection).await.unwrap();
        }
    }

    /// Creates `n` backups with distinct creation times, oldest first.
    pub async fn create_backups(&self, n: usize) -> Vec<Utf8PathBuf> {
        let mut paths = Vec::with_capacity(n);
        for _ in 0..n {
            paths.push(self.manager.create_backup(self.dir()).await.unwrap().path);
            tokio::time::sleep(FILE_GAP).await;
        }
        paths
    }

    pub fn remaining_files(&self) -> Vec<Utf8PathBuf> {
        let mut files: Vec<Utf8PathBuf> = std::fs::read_dir(&self.backup_dir)
            .unwrap()
            .map(|e| Utf8PathBuf::from_path_buf(e.unwrap().path()).expect("valid UTF-8"))
            .collect();
        files.sort();
        files
    }
}

/// Records with `_id`s unique per collection and index.
pub fn sample_records(collection: Collection, count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            json!({
                "_id": format!("{}-{}", collection.as_str(), i),
                "name": format!("{} #{}", collection.as_str(), i),
                "tags": ["seed", i],
            })
        })
        .collect()
}

/// A store whose reads of one collection always fail.
pub struct FailingReadStore {
    pub inner: MemoryStore,
    pub failing: Collection,
}

#[async_trait]
impl DataStore for FailingReadStore {
    fn database_name(&self) -> &str {
        self.inner.database_name()
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<Record>> {
        if collection == self.failing {
            return Err(Error::store(format!("connection reset reading {}", collection)));
        }
        self.inner.find_all(collection).await
    }

    async fn delete_all(&self, collection: Collection) -> Result<u64> {
        self.inner.delete_all(collection).await
    }

    async fn insert_many(&self, collection: Collection, records: Vec<Record>) -> Result<u64> {
        self.inner.insert_many(collection, records).await
    }

    async fn count(&self, collection: Collection, filter: Option<&Record>) -> Result<u64> {
        self.inner.count(collection, filter).await
    }
}
