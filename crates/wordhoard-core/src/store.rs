use std::collections::HashMap;
use std::sync::Arc;

use wordhoard_types::{PartOfSpeech, VocabEntry, normalize_key};

use crate::error::StoreError;
use crate::storage::{Storage, VOCAB_KEY};

/// Authoritative persisted map of learned entries. Each operation is a
/// full read-modify-write of the vocabulary key; two contexts mutating
/// concurrently race and the last writer wins (see the race test).
pub struct VocabularyStore {
    storage: Arc<dyn Storage>,
}

impl VocabularyStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn load(&self) -> Result<HashMap<String, VocabEntry>, StoreError> {
        let raw = self.storage.get(VOCAB_KEY).await?;
        let mut map: HashMap<String, VocabEntry> = match raw {
            Some(value) => serde_json::from_value(value)?,
            None => HashMap::new(),
        };
        // Imported or hand-edited data may omit the redundant in-record
        // key; the map key is authoritative.
        for (key, entry) in map.iter_mut() {
            if entry.key.is_empty() {
                entry.key = key.clone();
            }
            if entry.source_text.is_empty() {
                entry.source_text = entry.key.clone();
            }
        }
        Ok(map)
    }

    pub async fn save(&self, map: &HashMap<String, VocabEntry>) -> Result<(), StoreError> {
        let value = serde_json::to_value(map)?;
        self.storage.set(VOCAB_KEY, value).await
    }

    /// Create a new entry for `text`, or bump the existing one. A part
    /// of speech is only adopted where none was recorded yet.
    pub async fn upsert(
        &self,
        text: &str,
        translation: String,
        part_of_speech: Option<PartOfSpeech>,
    ) -> Result<VocabEntry, StoreError> {
        let key = normalize_key(text);
        let mut map = self.load().await?;

        let entry = match map.get_mut(&key) {
            Some(existing) => {
                existing.touch();
                existing.fill_part_of_speech(part_of_speech);
                existing.clone()
            }
            None => {
                let entry = VocabEntry::new(text, translation, part_of_speech);
                map.insert(key.clone(), entry.clone());
                entry
            }
        };

        self.save(&map).await?;
        tracing::debug!(key = %key, count = entry.count, "vocabulary upsert");
        Ok(entry)
    }

    /// Count increment driven by a click on an existing highlight.
    /// Returns the updated entry, or None when the key is gone (stale
    /// marker after a delete in another context).
    pub async fn record_click(&self, key: &str) -> Result<Option<VocabEntry>, StoreError> {
        let key = normalize_key(key);
        let mut map = self.load().await?;

        let Some(entry) = map.get_mut(&key) else {
            return Ok(None);
        };
        entry.touch();
        let updated = entry.clone();

        self.save(&map).await?;
        Ok(Some(updated))
    }

    /// Lazily record a part of speech fetched after the fact. Existing
    /// values are kept; a missing key is a silent no-op.
    pub async fn fill_part_of_speech(
        &self,
        key: &str,
        part_of_speech: PartOfSpeech,
    ) -> Result<(), StoreError> {
        let key = normalize_key(key);
        let mut map = self.load().await?;

        let Some(entry) = map.get_mut(&key) else {
            return Ok(());
        };
        if entry.part_of_speech.is_some() {
            return Ok(());
        }
        entry.part_of_speech = Some(part_of_speech);
        self.save(&map).await
    }

    /// Silent no-op when the key is absent; the caller may hold a stale
    /// snapshot and that is not an error.
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let key = normalize_key(key);
        let mut map = self.load().await?;
        if map.remove(&key).is_none() {
            return Ok(());
        }
        self.save(&map).await
    }

    pub async fn toggle_star(&self, key: &str) -> Result<(), StoreError> {
        let key = normalize_key(key);
        let mut map = self.load().await?;
        let Some(entry) = map.get_mut(&key) else {
            return Ok(());
        };
        entry.starred = !entry.starred;
        self.save(&map).await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.save(&HashMap::new()).await
    }
}
