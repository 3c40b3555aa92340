//! storekeep backup system
//!
//! Snapshots the five storefront collections (users, products, carts, orders,
//! wishlists) into a single JSON file, restores them back, lists existing
//! snapshots and prunes old ones by retention count.
//!
//! # Features
//!
//! - **Create**: reads every collection concurrently and writes one
//!   pretty-printed `backup-<timestamp>.json` file
//! - **Restore**: additive bulk insert per collection, optionally clearing the
//!   collections first; not transactional across collections
//! - **List**: tolerant of a missing directory and of unreadable files
//! - **Clean**: keeps the N most recently created files
//! - **Auto**: create followed by clean, also run daily by [`DailyScheduler`]
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use std::sync::Arc;
//! use storekeep_backup::BackupManager;
//! use storekeep_core::JsonDirStore;
//!
//! #[tokio::main]
//! async fn main() -> storekeep_core::Result<()> {
//!     let store = Arc::new(JsonDirStore::new("./data", "storefront"));
//!     let manager = BackupManager::new(store);
//!
//!     let created = manager.auto_backup(Utf8Path::new("./backups"), 5).await?;
//!     println!("Backup created: {} ({} bytes)", created.path, created.size_bytes);
//!     Ok(())
//! }
//! ```

pub mod listing;
pub mod manager;
pub mod scheduler;
pub mod snapshot;

// Re-export commonly used types
pub use listing::{human_bytes, list_backups, BackupEntry, BackupFile};
pub use manager::{BackupCreated, BackupManager, RestoreSummary};
pub use scheduler::{next_run_delay, DailyScheduler};
pub use snapshot::{
    filename_for, PerCollection, Snapshot, SnapshotData, SnapshotMetadata, SNAPSHOT_VERSION,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
