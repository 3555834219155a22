/// Record store abstraction
///
/// The worker only needs to enumerate, read and rewrite records. Records are
/// kept as untyped JSON so fields the worker does not own survive a rewrite.
pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("Record {collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },

    #[error("Invalid record key '{0}'")]
    InvalidKey(String),

    #[error("Record {collection}/{id} is not valid JSON: {source}")]
    Corrupt {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound { collection: collection.to_string(), id: id.to_string() }
    }
}

/// Durable key-value storage keyed by (collection, id)
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Ids of every record in a collection, sorted
    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError>;

    /// Read one record
    async fn read(&self, collection: &str, id: &str) -> Result<Value, StoreError>;

    /// Replace an existing record as a whole
    async fn update(&self, collection: &str, id: &str, record: &Value) -> Result<(), StoreError>;
}

/// Reject keys that could escape their collection or collide with temp files
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let invalid = key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\', '\0']);

    if invalid { Err(StoreError::InvalidKey(key.to_string())) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("checks").is_ok());
        assert!(validate_key("abcdefghij0123456789").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("../etc").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("a\\b").is_err());
    }
}
