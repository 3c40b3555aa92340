//! Data store access for the storefront collections
//!
//! The backup manager only ever talks to a [`DataStore`]; it never inspects
//! the records it moves around. Two bindings are provided:
//! - [`MemoryStore`]: in-process collections, used for tests and embedding
//! - [`JsonDirStore`]: one JSON array file per collection under a directory

mod json_dir;
mod memory;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque storefront document
pub type Record = serde_json::Value;

/// Field used as the unique key by the bundled stores
pub const KEY_FIELD: &str = "_id";

/// The five storefront collections, in snapshot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Users,
    Products,
    Carts,
    Orders,
    Wishlists,
}

impl Collection {
    /// Every collection covered by a backup
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Products,
        Collection::Carts,
        Collection::Orders,
        Collection::Wishlists,
    ];

    /// Position in [`Collection::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Collection name as stored in snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Products => "products",
            Self::Carts => "carts",
            Self::Orders => "orders",
            Self::Wishlists => "wishlists",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::store(format!("Unknown collection: {}", s)))
    }
}

/// Access to the storefront's document collections
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Name of the backing database, recorded in snapshot metadata
    fn database_name(&self) -> &str;

    /// Every record of a collection, in store order
    async fn find_all(&self, collection: Collection) -> Result<Vec<Record>>;

    /// Remove every record of a collection, returning how many were removed
    async fn delete_all(&self, collection: Collection) -> Result<u64>;

    /// Bulk insert, returning how many records were inserted
    async fn insert_many(&self, collection: Collection, records: Vec<Record>) -> Result<u64>;

    /// Count records, optionally only those matching `filter`
    async fn count(&self, collection: Collection, filter: Option<&Record>) -> Result<u64>;
}

/// The unique key of a record, if it carries one
pub fn record_key(record: &Record) -> Option<String> {
    match record.get(KEY_FIELD)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// True when every top-level field of `filter` equals the record's field.
/// A non-object filter matches nothing.
pub fn matches_filter(record: &Record, filter: &Record) -> bool {
    match filter.as_object() {
        Some(fields) => fields
            .iter()
            .all(|(key, expected)| record.get(key) == Some(expected)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_order_and_names() {
        let names: Vec<&str> = Collection::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, ["users", "products", "carts", "orders", "wishlists"]);
    }

    #[test]
    fn test_collection_index_matches_all() {
        for (i, collection) in Collection::ALL.into_iter().enumerate() {
            assert_eq!(collection.index(), i);
        }
    }

    #[test]
    fn test_collection_parse() {
        assert_eq!("orders".parse::<Collection>().unwrap(), Collection::Orders);
        assert!("reviews".parse::<Collection>().is_err());
    }

    #[test]
    fn test_record_key() {
        assert_eq!(record_key(&json!({"_id": "u1"})), Some("u1".to_string()));
        assert_eq!(record_key(&json!({"_id": 42})), Some("42".to_string()));
        assert_eq!(record_key(&json!({"_id": null})), None);
        assert_eq!(record_key(&json!({"name": "x"})), None);
    }

    #[test]
    fn test_matches_filter() {
        let record = json!({"role": "admin", "active": true, "name": "ana"});
        assert!(matches_filter(&record, &json!({"role": "admin"})));
        assert!(matches_filter(&record, &json!({"role": "admin", "active": true})));
        assert!(!matches_filter(&record, &json!({"role": "user"})));
        assert!(matches_filter(&record, &json!({})));
        assert!(!matches_filter(&record, &json!("admin")));
    }
}
