//! Directory-backed JSON document store
//!
//! Each collection is a single JSON array in `<dir>/<collection>.json`.
//! A missing file is an empty collection.

use super::{matches_filter, record_key, Collection, DataStore, Record};
use crate::error::{Error, Result};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// JSON files on local disk acting as a document database
///
/// Writes to one collection file are serialized; different collections are
/// written independently.
pub struct JsonDirStore {
    dir: Utf8PathBuf,
    database: String,
    write_locks: [Mutex<()>; 5],
}

impl JsonDirStore {
    pub fn new(dir: impl Into<Utf8PathBuf>, database: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            database: database.into(),
            write_locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    fn write_lock(&self, collection: Collection) -> &Mutex<()> {
        &self.write_locks[collection.index()]
    }

    fn collection_path(&self, collection: Collection) -> Utf8PathBuf {
        self.dir.join(format!("{}.json", collection.as_str()))
    }

    async fn read_collection(&self, collection: Collection) -> Result<Vec<Record>> {
        let path = self.collection_path(collection);
        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&content)
            .map_err(|e| Error::store(format!("Corrupt collection file {}: {}", path, e)))
    }

    async fn write_collection(&self, collection: Collection, records: &[Record]) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.collection_path(collection);
        let content = serde_json::to_vec_pretty(records)?;
        fs::write(&path, content).await?;
        debug!("Wrote {} records to {}", records.len(), path);
        Ok(())
    }
}

#[async_trait]
impl DataStore for JsonDirStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<Record>> {
        self.read_collection(collection).await
    }

    async fn delete_all(&self, collection: Collection) -> Result<u64> {
        let _guard = self.write_lock(collection).lock().await;
        let removed = self.read_collection(collection).await?.len() as u64;
        self.write_collection(collection, &[]).await?;
        Ok(removed)
    }

    async fn insert_many(&self, collection: Collection, records: Vec<Record>) -> Result<u64> {
        let _guard = self.write_lock(collection).lock().await;
        let mut existing = self.read_collection(collection).await?;

        let mut keys: HashSet<String> = existing.iter().filter_map(record_key).collect();
        for record in &records {
            if let Some(key) = record_key(record) {
                if !keys.insert(key.clone()) {
                    return Err(Error::duplicate_key(collection.as_str(), key));
                }
            }
        }

        let inserted = records.len() as u64;
        existing.extend(records);
        self.write_collection(collection, &existing).await?;

        Ok(inserted)
    }

    async fn count(&self, collection: Collection, filter: Option<&Record>) -> Result<u64> {
        let records = self.read_collection(collection).await?;
        let count = match filter {
            Some(filter) => records.iter().filter(|r| matches_filter(r, filter)).count(),
            None => records.len(),
        };
        Ok(count as u64)
    }
}
