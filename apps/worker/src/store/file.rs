//! JSON file store: one document per record at
//! `<base_dir>/<collection>/<id>.json`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::{RecordStore, StoreError, validate_key};

const RECORD_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    /// Create the base directory if needed and return a store rooted there
    pub async fn open(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(base_dir);
        fs::create_dir_all(&store.base_dir).await?;
        Ok(store)
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf, StoreError> {
        validate_key(collection)?;
        Ok(self.base_dir.join(collection))
    }

    fn record_path(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        validate_key(id)?;
        Ok(self.collection_dir(collection)?.join(format!("{id}.{RECORD_EXTENSION}")))
    }

    /// Store a new record, failing if one already exists under `id`
    pub async fn create(&self, collection: &str, id: &str, record: &Value) -> Result<(), StoreError> {
        let path = self.record_path(collection, id)?;
        fs::create_dir_all(self.collection_dir(collection)?).await?;

        let contents = serde_json::to_vec(record)?;
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(&contents).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.collection_dir(collection)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != RECORD_EXTENSION) {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|stem| stem.to_str())
                && validate_key(id).is_ok()
            {
                ids.push(id.to_string());
            }
        }

        ids.sort();
        Ok(ids)
    }

    async fn read(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let path = self.record_path(collection, id)?;
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::not_found(collection, id));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            collection: collection.to_string(),
            id: id.to_string(),
            source,
        })
    }

    async fn update(&self, collection: &str, id: &str, record: &Value) -> Result<(), StoreError> {
        let path = self.record_path(collection, id)?;
        match fs::metadata(&path).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::not_found(collection, id));
            }
            Err(e) => return Err(e.into()),
        }

        // Write beside the record and rename over it, so readers and
        // concurrent writers only ever see one complete document.
        let contents = serde_json::to_vec(record)?;
        let tmp = path.with_file_name(format!(".{id}.{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, &contents).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        Ok(())
    }
}
