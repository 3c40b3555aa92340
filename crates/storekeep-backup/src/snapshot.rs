//! Snapshot file format.
//!
//! A snapshot is one pretty-printed JSON document holding a `metadata`
//! header and the raw records of every collection under `data`:
//!
//! ```text
//! {
//!   "metadata": { "timestamp", "version", "database", "collections": { name: count } },
//!   "data": { name: [record, ...] }
//! }
//! ```
//!
//! Every collection is always written, even when empty.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use storekeep_core::{Collection, Record};

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Prefix of every backup filename.
pub const FILENAME_PREFIX: &str = "backup-";

/// Extension of every backup filename.
pub const FILENAME_EXTENSION: &str = ".json";

/// One value per storefront collection.
///
/// Collections missing from a parsed document take `T::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct PerCollection<T> {
    pub users: T,
    pub products: T,
    pub carts: T,
    pub orders: T,
    pub wishlists: T,
}

impl<T> PerCollection<T> {
    /// Build a value for every collection.
    pub fn from_fn(mut f: impl FnMut(Collection) -> T) -> Self {
        Self {
            users: f(Collection::Users),
            products: f(Collection::Products),
            carts: f(Collection::Carts),
            orders: f(Collection::Orders),
            wishlists: f(Collection::Wishlists),
        }
    }

    pub fn get(&self, collection: Collection) -> &T {
        match collection {
            Collection::Users => &self.users,
            Collection::Products => &self.products,
            Collection::Carts => &self.carts,
            Collection::Orders => &self.orders,
            Collection::Wishlists => &self.wishlists,
        }
    }

    pub fn get_mut(&mut self, collection: Collection) -> &mut T {
        match collection {
            Collection::Users => &mut self.users,
            Collection::Products => &mut self.products,
            Collection::Carts => &mut self.carts,
            Collection::Orders => &mut self.orders,
            Collection::Wishlists => &mut self.wishlists,
        }
    }

    /// Collections paired with their values, in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = (Collection, &T)> {
        Collection::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerCollection<U> {
        PerCollection {
            users: f(self.users),
            products: f(self.products),
            carts: f(self.carts),
            orders: f(self.orders),
            wishlists: f(self.wishlists),
        }
    }
}

/// Snapshot header, also shown when listing backups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// ISO-8601 creation time
    pub timestamp: String,

    /// Snapshot format version
    pub version: String,

    /// Source database name
    pub database: String,

    /// Record count per collection at snapshot time
    pub collections: PerCollection<usize>,
}

impl SnapshotMetadata {
    /// Creation time, if the timestamp is valid RFC 3339.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Raw records of every collection.
pub type SnapshotData = PerCollection<Vec<Record>>;

/// A complete backup document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub data: SnapshotData,
}

/// Only the header of a snapshot document; `data` is skipped unparsed.
#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotHeader {
    pub metadata: SnapshotMetadata,
}

/// What restore reads from a backup file.
///
/// Only `data` is required. `metadata` is ignored, and a collection that is
/// absent or `null` restores nothing.
#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotPayload {
    data: PerCollection<Option<Vec<Record>>>,
}

impl SnapshotPayload {
    pub fn from_json_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    pub fn into_data(self) -> SnapshotData {
        self.data.map(Option::unwrap_or_default)
    }
}

impl Snapshot {
    /// Build a snapshot from freshly read records.
    pub fn new(created_at: DateTime<Utc>, database: impl Into<String>, data: SnapshotData) -> Self {
        let collections = PerCollection::from_fn(|c| data.get(c).len());
        Self {
            metadata: SnapshotMetadata {
                timestamp: format_timestamp(created_at),
                version: SNAPSHOT_VERSION.to_string(),
                database: database.into(),
                collections,
            },
            data,
        }
    }

    /// Filename this snapshot is written under.
    pub fn filename(&self) -> String {
        filename_for(&self.metadata.timestamp)
    }

    /// Pretty-printed JSON document.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `backup-<timestamp>.json` with `:` and `.` replaced by `-`.
pub fn filename_for(timestamp: &str) -> String {
    let safe = timestamp.replace([':', '.'], "-");
    format!("{}{}{}", FILENAME_PREFIX, safe, FILENAME_EXTENSION)
}
