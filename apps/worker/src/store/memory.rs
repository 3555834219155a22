use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{RecordStore, StoreError, validate_key};

/// In-process record store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record
    pub async fn insert(&self, collection: &str, id: &str, record: Value) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
    }

    pub async fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections.read().await.get(collection)?.get(id).cloned()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        validate_key(collection)?;
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        self.get(collection, id).await.ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn update(&self, collection: &str, id: &str, record: &Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        *slot = record.clone();
        Ok(())
    }
}
