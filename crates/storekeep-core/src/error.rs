//! Error types for storekeep-core

use thiserror::Error;

/// Result type alias using storekeep-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for storekeep
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value or file
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A backup file could not be read back as a snapshot
    #[error("Invalid backup file {path}: {message}")]
    InvalidSnapshot { path: String, message: String },

    /// Bulk insert hit a record whose key already exists
    #[error("Duplicate key in {collection}: _id {key} already exists")]
    DuplicateKey { collection: String, key: String },

    /// Any other data store failure
    #[error("Data store error: {message}")]
    Store { message: String },
}

impl Error {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid snapshot error
    pub fn invalid_snapshot(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate key error
    pub fn duplicate_key(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            collection: collection.into(),
            key: key.into(),
        }
    }

    /// Create a generic store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Returns true if this is an IO "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_message() {
        let err = Error::duplicate_key("products", "p-1");
        assert_eq!(
            err.to_string(),
            "Duplicate key in products: _id p-1 already exists"
        );
    }

    #[test]
    fn test_is_not_found() {
        let err = Error::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = Error::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(!err.is_not_found());

        assert!(!Error::store("boom").is_not_found());
    }
}
