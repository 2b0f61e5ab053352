use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{PhoneticInfo, Phonetics};

/// Page-lifetime lookup cache keyed by normalized text. Nothing is
/// evicted; a page session does not live long enough to need it.
pub struct SessionCache<V: Clone> {
    entries: HashMap<String, V>,
}

impl<V: Clone> SessionCache<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, text: &str) -> Option<V> {
        self.entries.get(&normalize(text)).cloned()
    }

    pub fn insert(&mut self, text: &str, value: V) {
        self.entries.insert(normalize(text), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for SessionCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Caching wrapper over a phonetics source. Lookup never fails: a
/// backend error is recorded as an empty result so the same word is not
/// retried for the rest of the session.
pub struct CachedPhonetics {
    inner: Arc<dyn Phonetics>,
    cache: Mutex<SessionCache<PhoneticInfo>>,
}

impl CachedPhonetics {
    pub fn new(inner: Arc<dyn Phonetics>) -> Self {
        Self {
            inner,
            cache: Mutex::new(SessionCache::new()),
        }
    }

    pub async fn lookup(&self, word: &str) -> PhoneticInfo {
        if let Ok(cache) = self.cache.lock()
            && let Some(info) = cache.get(word)
        {
            return info;
        }

        let info = match self.inner.lookup(word).await {
            Ok(info) => info,
            Err(e) => {
                tracing::debug!(word, error = %e, "phonetic lookup failed, caching empty result");
                PhoneticInfo::default()
            }
        };

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(word, info.clone());
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::TranslateError;
    use wordhoard_types::PartOfSpeech;

    #[test]
    fn cache_key_is_normalized() {
        let mut cache = SessionCache::new();
        cache.insert("  Hello ", "你好".to_string());
        assert_eq!(cache.get("hello").as_deref(), Some("你好"));
        assert_eq!(cache.get("HELLO").as_deref(), Some("你好"));
        assert_eq!(cache.len(), 1);
    }

    struct CountingPhonetics {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Phonetics for CountingPhonetics {
        async fn lookup(&self, _word: &str) -> Result<PhoneticInfo, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(TranslateError::ApiError("boom".to_string()))
            } else {
                Ok(PhoneticInfo {
                    phonetic: Some("/həˈloʊ/".to_string()),
                    part_of_speech: Some(PartOfSpeech::Interjection),
                })
            }
        }
    }

    #[tokio::test]
    async fn repeated_lookups_hit_the_backend_once() {
        let backend = Arc::new(CountingPhonetics {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let cached = CachedPhonetics::new(backend.clone());

        let first = cached.lookup("hello").await;
        let second = cached.lookup("Hello").await;
        assert_eq!(first, second);
        assert_eq!(first.phonetic.as_deref(), Some("/həˈloʊ/"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn backend_errors_cache_an_empty_result() {
        let backend = Arc::new(CountingPhonetics {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let cached = CachedPhonetics::new(backend.clone());

        assert_eq!(cached.lookup("hello").await, PhoneticInfo::default());
        assert_eq!(cached.lookup("hello").await, PhoneticInfo::default());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }
}
