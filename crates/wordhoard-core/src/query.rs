use std::collections::HashMap;

use wordhoard_types::{CategoryFilter, SortMode, VocabEntry};

use crate::cache::SearchCache;
use crate::index::{IndexEngine, IndexSnapshot};

/// Read API for list views: category filtering, token search with
/// relevance order, explicit sort overrides, pagination over a computed
/// list. Owns its snapshot and cache; `refresh` swaps both together so
/// no cached positions ever point into a stale snapshot.
pub struct QueryService {
    snapshot: IndexSnapshot,
    cache: SearchCache,
}

impl QueryService {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            snapshot: IndexSnapshot::default(),
            cache: SearchCache::new(cache_capacity),
        }
    }

    /// Rebuild derived state from a fresh vocabulary snapshot. Must run
    /// after every storage change notification before serving queries.
    pub fn refresh(&mut self, map: &HashMap<String, VocabEntry>) {
        self.snapshot = IndexEngine::rebuild(map);
        self.cache.clear();
        tracing::debug!(entries = self.snapshot.len(), "index rebuilt");
    }

    pub fn snapshot(&self) -> &IndexSnapshot {
        &self.snapshot
    }

    /// Per-category entry counts for the overview panel.
    pub fn counts(&self) -> HashMap<CategoryFilter, usize> {
        [
            CategoryFilter::All,
            CategoryFilter::Word,
            CategoryFilter::Phrase,
            CategoryFilter::Sentence,
            CategoryFilter::Starred,
        ]
        .into_iter()
        .map(|f| (f, self.snapshot.partition(f).len()))
        .collect()
    }

    /// Most recently used entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<VocabEntry> {
        let mut entries: Vec<&VocabEntry> = self.snapshot.entries.iter().collect();
        entries.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        entries.into_iter().take(limit).cloned().collect()
    }

    /// Ordered result list for a view. Empty term returns the category
    /// partition (count-descending); a non-empty term runs an AND-match
    /// over the inverted index in relevance order. An explicit sort mode
    /// overrides either ordering. Total for all inputs: absent matches
    /// are an empty list, never an error.
    pub fn query(
        &mut self,
        filter: CategoryFilter,
        term: &str,
        sort: Option<SortMode>,
    ) -> Vec<VocabEntry> {
        let term = term.trim().to_lowercase();

        let positions: Vec<usize> = if term.is_empty() {
            self.snapshot.partition(filter).to_vec()
        } else if let Some(cached) = self.cache.get(filter, &term) {
            cached.clone()
        } else {
            let computed = self.search(filter, &term);
            self.cache.put(filter, &term, computed.clone());
            computed
        };

        let mut results: Vec<VocabEntry> = positions
            .iter()
            .map(|&p| self.snapshot.entries[p].clone())
            .collect();

        if let Some(mode) = sort {
            sort_entries(&mut results, mode);
        }
        results
    }

    /// AND-intersection of postings across all search tokens, restricted
    /// to the category partition, ordered by relevance score descending.
    fn search(&self, filter: CategoryFilter, term: &str) -> Vec<usize> {
        let tokens: Vec<&str> = term.split_whitespace().collect();
        if tokens.is_empty() {
            return self.snapshot.partition(filter).to_vec();
        }

        let mut intersection: Option<Vec<usize>> = None;
        for token in &tokens {
            let Some(postings) = self.snapshot.postings(token) else {
                // Exact AND semantics: one absent token empties the result.
                return Vec::new();
            };
            intersection = Some(match intersection {
                None => {
                    // Walk the partition so the base order stays the
                    // partition's count-descending order.
                    self.snapshot
                        .partition(filter)
                        .iter()
                        .copied()
                        .filter(|p| postings.contains(p))
                        .collect()
                }
                Some(current) => current
                    .into_iter()
                    .filter(|p| postings.contains(p))
                    .collect(),
            });
        }

        let mut matched = intersection.unwrap_or_default();
        matched.sort_by_key(|&p| std::cmp::Reverse(relevance_score(&self.snapshot.entries[p], &tokens)));
        matched
    }
}

/// +10 per token found in the key, +5 in the translation, +1 in the
/// combined text, summed over all search tokens.
fn relevance_score(entry: &VocabEntry, tokens: &[&str]) -> u32 {
    let key = entry.key.to_lowercase();
    let translation = entry.translation.to_lowercase();
    let combined = format!("{key} {translation}");

    let mut score = 0;
    for token in tokens {
        if key.contains(token) {
            score += 10;
        }
        if translation.contains(token) {
            score += 5;
        }
        if combined.contains(token) {
            score += 1;
        }
    }
    score
}

fn sort_entries(entries: &mut [VocabEntry], mode: SortMode) {
    match mode {
        SortMode::Count => entries.sort_by(|a, b| b.count.cmp(&a.count)),
        SortMode::LastUsed => entries.sort_by(|a, b| b.last_used.cmp(&a.last_used)),
        SortMode::Alphabetical => entries.sort_by(|a, b| a.key.cmp(&b.key)),
    }
}

/// Stable slice of a previously computed ordered list. Page turns never
/// re-query; they just slice again.
pub fn page_slice<T>(list: &[T], page_index: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page_index.saturating_mul(page_size);
    if start >= list.len() {
        return &[];
    }
    let end = (start + page_size).min(list.len());
    &list[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, translation: &str, count: u32) -> VocabEntry {
        let mut e = VocabEntry::new(key, translation.to_string(), None);
        e.count = count;
        e
    }

    fn service(entries: Vec<VocabEntry>) -> QueryService {
        let map: HashMap<String, VocabEntry> =
            entries.into_iter().map(|e| (e.key.clone(), e)).collect();
        let mut service = QueryService::new(100);
        service.refresh(&map);
        service
    }

    #[test]
    fn empty_term_returns_partition_by_count() {
        let mut service = service(vec![
            entry("a", "甲", 5),
            entry("b", "乙", 1),
            entry("c", "丙", 9),
        ]);

        let results = service.query(CategoryFilter::All, "", Some(SortMode::Count));
        let counts: Vec<u32> = results.iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![9, 5, 1]);
    }

    #[test]
    fn search_requires_every_token() {
        let mut service = service(vec![
            entry("alpha beta", "阿尔法", 1),
            entry("alpha", "只有阿尔法", 2),
        ]);

        let both = service.query(CategoryFilter::All, "alpha beta", None);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].key, "alpha beta");

        let missing = service.query(CategoryFilter::All, "alpha gamma", None);
        assert!(missing.is_empty());
    }

    #[test]
    fn search_is_idempotent() {
        let mut service = service(vec![
            entry("hello world", "你好世界", 2),
            entry("hello", "你好", 7),
        ]);

        let first: Vec<String> = service
            .query(CategoryFilter::All, "hello", None)
            .into_iter()
            .map(|e| e.key)
            .collect();
        let second: Vec<String> = service
            .query(CategoryFilter::All, "hello", None)
            .into_iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn key_matches_outrank_translation_matches() {
        let mut service = service(vec![
            entry("light", "光", 1),
            entry("lamp", "light source", 9),
        ]);

        let results = service.query(CategoryFilter::All, "light", None);
        assert_eq!(results[0].key, "light");
        assert_eq!(results[1].key, "lamp");
    }

    #[test]
    fn explicit_sort_overrides_relevance() {
        let mut service = service(vec![
            entry("light", "光", 1),
            entry("lamp", "light source", 9),
        ]);

        let results = service.query(CategoryFilter::All, "light", Some(SortMode::Count));
        assert_eq!(results[0].key, "lamp");
    }

    #[test]
    fn category_filter_restricts_search() {
        let mut service = service(vec![
            entry("give up", "放弃 stop", 1),
            entry("stop", "停", 2),
        ]);

        let phrases = service.query(CategoryFilter::Phrase, "stop", None);
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].key, "give up");
    }

    #[test]
    fn refresh_invalidates_cached_results() {
        let mut service = service(vec![entry("hello", "你好", 1)]);
        assert_eq!(service.query(CategoryFilter::All, "hello", None).len(), 1);

        service.refresh(&HashMap::new());
        assert!(service.query(CategoryFilter::All, "hello", None).is_empty());
    }

    #[test]
    fn page_slice_is_stable_and_bounded() {
        let list: Vec<u32> = (0..12).collect();
        assert_eq!(page_slice(&list, 0, 5), &[0, 1, 2, 3, 4]);
        assert_eq!(page_slice(&list, 2, 5), &[10, 11]);
        assert!(page_slice(&list, 3, 5).is_empty());
        assert!(page_slice(&list, 0, 0).is_empty());
    }

    #[test]
    fn recent_orders_by_last_used() {
        let mut old = entry("old", "旧", 1);
        old.last_used = time::OffsetDateTime::now_utc() - time::Duration::days(3);
        let service = service(vec![old, entry("new", "新", 1)]);

        let recent = service.recent(1);
        assert_eq!(recent[0].key, "new");
    }
}
