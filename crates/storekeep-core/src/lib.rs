//! # storekeep-core
//!
//! Core library for storekeep providing:
//! - Layered configuration (defaults, YAML file, environment overrides)
//! - The shared error type
//! - The `DataStore` abstraction over the five storefront collections,
//!   with an in-memory and a directory-backed JSON binding

pub mod config;
pub mod error;
pub mod store;

pub use config::Settings;
pub use error::{Error, Result};
pub use store::{Collection, DataStore, JsonDirStore, MemoryStore, Record};
