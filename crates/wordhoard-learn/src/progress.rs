use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use wordhoard_core::{PROGRESS_KEY, Storage, StoreError};

/// Review interval in days for each mastery level. A word answered
/// correctly at level N comes due again after INTERVAL_DAYS[N] days.
pub const INTERVAL_DAYS: [i64; 6] = [1, 2, 4, 7, 14, 30];

const MAX_MASTERY: u8 = 5;

/// Per-word spaced-repetition state, persisted as one map under the
/// progress storage key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    /// 0 (new) through 5 (mastered).
    pub mastery_level: u8,
    pub review_count: u32,
    pub correct_count: u32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_reviewed: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub next_review: Option<OffsetDateTime>,
}

impl WordProgress {
    /// Apply one review outcome: correct answers climb one mastery
    /// level, wrong answers drop one, both clamped to 0..=5. The next
    /// due date follows the interval table at the new level.
    pub fn record_result(&mut self, correct: bool) {
        self.review_count += 1;
        if correct {
            self.correct_count += 1;
            self.mastery_level = (self.mastery_level + 1).min(MAX_MASTERY);
        } else {
            self.mastery_level = self.mastery_level.saturating_sub(1);
        }

        let now = OffsetDateTime::now_utc();
        self.last_reviewed = Some(now);
        self.next_review = Some(now + Duration::days(INTERVAL_DAYS[self.mastery_level as usize]));
    }

    pub fn due(&self, now: OffsetDateTime) -> bool {
        match self.next_review {
            Some(next) => next <= now,
            None => true,
        }
    }
}

/// Persistence for the progress map, same read-modify-write shape as
/// the vocabulary store.
pub struct ProgressStore {
    storage: Arc<dyn Storage>,
}

impl ProgressStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn load(&self) -> Result<HashMap<String, WordProgress>, StoreError> {
        let raw = self.storage.get(PROGRESS_KEY).await?;
        Ok(match raw {
            Some(value) => serde_json::from_value(value)?,
            None => HashMap::new(),
        })
    }

    pub async fn save(&self, map: &HashMap<String, WordProgress>) -> Result<(), StoreError> {
        let value = serde_json::to_value(map)?;
        self.storage.set(PROGRESS_KEY, value).await
    }

    /// Record a review outcome for one word and return its new state.
    pub async fn record(&self, key: &str, correct: bool) -> Result<WordProgress, StoreError> {
        let mut map = self.load().await?;
        let progress = map.entry(key.to_string()).or_default();
        progress.record_result(correct);
        let updated = progress.clone();

        self.save(&map).await?;
        tracing::debug!(key, mastery = updated.mastery_level, "review recorded");
        Ok(updated)
    }

    /// Drop progress for words no longer in the vocabulary.
    pub async fn prune(&self, live_keys: &[&str]) -> Result<(), StoreError> {
        let mut map = self.load().await?;
        let before = map.len();
        map.retain(|key, _| live_keys.contains(&key.as_str()));
        if map.len() != before {
            self.save(&map).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordhoard_core::MemoryStorage;

    #[test]
    fn mastery_clamps_at_both_ends() {
        let mut progress = WordProgress::default();
        progress.record_result(false);
        assert_eq!(progress.mastery_level, 0);

        for _ in 0..8 {
            progress.record_result(true);
        }
        assert_eq!(progress.mastery_level, 5);
        assert_eq!(progress.review_count, 9);
        assert_eq!(progress.correct_count, 8);
    }

    #[test]
    fn next_review_follows_the_interval_table() {
        let mut progress = WordProgress::default();
        progress.record_result(true); // level 1 -> 2 days

        let last = progress.last_reviewed.unwrap();
        let next = progress.next_review.unwrap();
        assert_eq!(next - last, Duration::days(2));

        progress.record_result(false); // back to level 0 -> 1 day
        let last = progress.last_reviewed.unwrap();
        let next = progress.next_review.unwrap();
        assert_eq!(next - last, Duration::days(1));
    }

    #[test]
    fn unreviewed_words_are_always_due() {
        let progress = WordProgress::default();
        assert!(progress.due(OffsetDateTime::now_utc()));

        let mut reviewed = WordProgress::default();
        reviewed.record_result(true);
        assert!(!reviewed.due(OffsetDateTime::now_utc()));
    }

    #[tokio::test]
    async fn record_persists_and_prune_drops_dead_keys() {
        let store = ProgressStore::new(MemoryStorage::new());

        store.record("cat", true).await.unwrap();
        store.record("dog", false).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 2);

        store.prune(&["cat"]).await.unwrap();
        let map = store.load().await.unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["cat"].mastery_level, 1);
    }
}
