//! In-memory data store

use super::{matches_filter, record_key, Collection, DataStore, Record};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

/// Collections held in process memory.
///
/// Each collection has its own lock, so operations on different collections
/// never wait for each other.
///
/// `insert_many` behaves like an ordered bulk insert: records are appended one
/// by one and the first record whose `_id` already exists aborts the batch,
/// leaving the records before it in place.
pub struct MemoryStore {
    database: String,
    collections: [RwLock<Vec<Record>>; 5],
}

impl MemoryStore {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: std::array::from_fn(|_| RwLock::new(Vec::new())),
        }
    }

    fn collection(&self, collection: Collection) -> &RwLock<Vec<Record>> {
        &self.collections[collection.index()]
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<Record>> {
        Ok(self.collection(collection).read().await.clone())
    }

    async fn delete_all(&self, collection: Collection) -> Result<u64> {
        let mut records = self.collection(collection).write().await;
        let removed = std::mem::take(&mut *records).len() as u64;
        debug!("Deleted {} records from {}", removed, collection);
        Ok(removed)
    }

    async fn insert_many(&self, collection: Collection, records: Vec<Record>) -> Result<u64> {
        let mut existing = self.collection(collection).write().await;

        let mut keys: HashSet<String> = existing.iter().filter_map(record_key).collect();
        let mut inserted = 0;

        for record in records {
            if let Some(key) = record_key(&record) {
                if !keys.insert(key.clone()) {
                    return Err(Error::duplicate_key(collection.as_str(), key));
                }
            }
            existing.push(record);
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn count(&self, collection: Collection, filter: Option<&Record>) -> Result<u64> {
        let records = self.collection(collection).read().await;
        let count = match filter {
            Some(filter) => records.iter().filter(|r| matches_filter(r, filter)).count(),
            None => records.len(),
        };
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStore::new("shop");
        let inserted = store
            .insert_many(
                Collection::Products,
                vec![json!({"_id": "p1"}), json!({"_id": "p2"})],
            )
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(store.database_name(), "shop");

        let products = store.find_all(Collection::Products).await.unwrap();
        assert_eq!(products, vec![json!({"_id": "p1"}), json!({"_id": "p2"})]);
        assert!(store.find_all(Collection::Users).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_key_keeps_earlier_records() {
        let store = MemoryStore::new("shop");
        store
            .insert_many(Collection::Users, vec![json!({"_id": "u2"})])
            .await
            .unwrap();

        let err = store
            .insert_many(
                Collection::Users,
                vec![json!({"_id": "u1"}), json!({"_id": "u2"}), json!({"_id": "u3"})],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateKey { ref key, .. } if key == "u2"));
        assert_eq!(store.count(Collection::Users, None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_records_without_key_never_collide() {
        let store = MemoryStore::new("shop");
        let inserted = store
            .insert_many(Collection::Carts, vec![json!({"items": []}), json!({"items": []})])
            .await
            .unwrap();
        assert_eq!(inserted, 2);
    }

    #[tokio::test]
    async fn test_collections_lock_independently() {
        let store = MemoryStore::new("shop");
        let _users = store.collection(Collection::Users).write().await;

        let inserted = tokio::time::timeout(
            Duration::from_secs(1),
            store.insert_many(Collection::Products, vec![json!({"_id": "p1"})]),
        )
        .await
        .expect("products should not wait on the users lock")
        .unwrap();
        assert_eq!(inserted, 1);
    }

    #[tokio::test]
    async fn test_delete_all_and_count_filter() {
        let store = MemoryStore::new("shop");
        store
            .insert_many(
                Collection::Orders,
                vec![
                    json!({"_id": "o1", "status": "paid"}),
                    json!({"_id": "o2", "status": "pending"}),
                    json!({"_id": "o3", "status": "paid"}),
                ],
            )
            .await
            .unwrap();

        let paid = json!({"status": "paid"});
        assert_eq!(store.count(Collection::Orders, Some(&paid)).await.unwrap(), 2);

        assert_eq!(store.delete_all(Collection::Orders).await.unwrap(), 3);
        assert_eq!(store.count(Collection::Orders, None).await.unwrap(), 0);
        assert_eq!(store.delete_all(Collection::Orders).await.unwrap(), 0);
    }
}
