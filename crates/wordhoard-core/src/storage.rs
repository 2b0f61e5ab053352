use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use crate::error::StoreError;

/// Storage key holding the whole vocabulary map. The map is the unit of
/// consistency: reads and writes move it as one value.
pub const VOCAB_KEY: &str = "translatedWords";
/// Storage key for the user settings object.
pub const SETTINGS_KEY: &str = "userSettings";
/// Storage key for per-word spaced-repetition progress.
pub const PROGRESS_KEY: &str = "learningProgress";

/// Notification that a top-level key was written. Delivery order is the
/// only guarantee; there is no global ordering across writers.
#[derive(Debug, Clone)]
pub struct StorageChange {
    pub key: String,
}

/// The extension's persistent key-value store, seen as an opaque async
/// capability. Every call is a suspension point; no atomicity holds
/// across two calls, so concurrent read-modify-write sequences from
/// different execution contexts race (last writer wins per key).
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;

    /// Change-notification stream for resynchronizing derived state.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}

/// In-memory backend used by the local binary and by tests. Mirrors the
/// per-key last-writer-wins semantics of the real store.
pub struct MemoryStorage {
    values: RwLock<HashMap<String, serde_json::Value>>,
    changes: broadcast::Sender<StorageChange>,
}

impl MemoryStorage {
    pub fn new() -> Arc<Self> {
        let (changes, _) = broadcast::channel(64);
        Arc::new(Self {
            values: RwLock::new(HashMap::new()),
            changes,
        })
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        self.values.write().await.insert(key.to_string(), value);
        // No subscribers is fine; the send result only reports that.
        let _ = self.changes.send(StorageChange {
            key: key.to_string(),
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}
