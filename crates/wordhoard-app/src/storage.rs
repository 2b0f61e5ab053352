use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use wordhoard_core::{Storage, StorageChange, StoreError};

/// File-backed storage for the local binary: one JSON object on disk
/// holding every top-level key. Loaded once at startup, rewritten whole
/// on each set, same per-key last-writer-wins semantics as the
/// in-memory backend.
pub struct JsonFileStorage {
    path: PathBuf,
    values: RwLock<HashMap<String, serde_json::Value>>,
    changes: broadcast::Sender<StorageChange>,
}

impl JsonFileStorage {
    pub fn open(path: &Path) -> anyhow::Result<Arc<Self>> {
        let values = if path.exists() {
            let data = std::fs::read_to_string(path)?;
            serde_json::from_str(&data)?
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            HashMap::new()
        };

        let (changes, _) = broadcast::channel(64);
        Ok(Arc::new(Self {
            path: path.to_path_buf(),
            values: RwLock::new(values),
            changes,
        }))
    }

    async fn persist(&self, values: &HashMap<String, serde_json::Value>) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(values)?;
        tokio::fs::write(&self.path, data)
            .await
            .map_err(|e| StoreError::Backend(format!("write {}: {e}", self.path.display())))
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value);
        self.persist(&values).await?;
        drop(values);

        let _ = self.changes.send(StorageChange {
            key: key.to_string(),
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
