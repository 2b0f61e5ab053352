use std::collections::{HashMap, VecDeque};

use wordhoard_types::CategoryFilter;

/// Memo of (category, search term) -> entry positions. Bounded, with
/// FIFO eviction by insertion order (deliberately not LRU: a hit does
/// not refresh the key). Cached positions reference one index snapshot,
/// so the owner clears the cache on every rebuild.
pub struct SearchCache {
    results: HashMap<(CategoryFilter, String), Vec<usize>>,
    insertion_order: VecDeque<(CategoryFilter, String)>,
    capacity: usize,
}

impl SearchCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            results: HashMap::new(),
            insertion_order: VecDeque::new(),
            capacity,
        }
    }

    pub fn get(&self, filter: CategoryFilter, term: &str) -> Option<&Vec<usize>> {
        self.results.get(&(filter, term.to_string()))
    }

    pub fn put(&mut self, filter: CategoryFilter, term: &str, positions: Vec<usize>) {
        let key = (filter, term.to_string());
        if self.results.contains_key(&key) {
            self.results.insert(key, positions);
            return;
        }

        if self.results.len() >= self.capacity {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.results.remove(&oldest);
            }
        }

        self.insertion_order.push_back(key.clone());
        self.results.insert(key, positions);
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eviction_is_fifo_not_lru() {
        let mut cache = SearchCache::new(2);
        cache.put(CategoryFilter::All, "first", vec![1]);
        cache.put(CategoryFilter::All, "second", vec![2]);

        // Touching "first" must not rescue it from eviction.
        assert!(cache.get(CategoryFilter::All, "first").is_some());

        cache.put(CategoryFilter::All, "third", vec![3]);
        assert!(cache.get(CategoryFilter::All, "first").is_none());
        assert!(cache.get(CategoryFilter::All, "second").is_some());
        assert!(cache.get(CategoryFilter::All, "third").is_some());
    }

    #[test]
    fn overwrite_does_not_grow_the_cache() {
        let mut cache = SearchCache::new(2);
        cache.put(CategoryFilter::All, "term", vec![1]);
        cache.put(CategoryFilter::All, "term", vec![1, 2]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(CategoryFilter::All, "term"), Some(&vec![1, 2]));
    }

    #[test]
    fn clear_empties_everything() {
        let mut cache = SearchCache::new(4);
        cache.put(CategoryFilter::Word, "a", vec![]);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(CategoryFilter::Word, "a").is_none());
    }
}
