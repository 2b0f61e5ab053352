use std::collections::{HashMap, HashSet};

use wordhoard_types::{CategoryFilter, EntryKind, VocabEntry};

/// Derived read model over one vocabulary snapshot: category partitions
/// sorted by usage, plus a token inverted index for search. Always
/// rebuilt wholesale from the persisted map, never patched in place.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    /// Canonical entry array; postings index into it.
    pub entries: Vec<VocabEntry>,
    all: Vec<usize>,
    word: Vec<usize>,
    phrase: Vec<usize>,
    sentence: Vec<usize>,
    starred: Vec<usize>,
    /// token -> positions of entries whose key+translation contains it.
    postings: HashMap<String, HashSet<usize>>,
}

impl IndexSnapshot {
    /// Partition for a category filter, sorted by count descending.
    pub fn partition(&self, filter: CategoryFilter) -> &[usize] {
        match filter {
            CategoryFilter::All => &self.all,
            CategoryFilter::Word => &self.word,
            CategoryFilter::Phrase => &self.phrase,
            CategoryFilter::Sentence => &self.sentence,
            CategoryFilter::Starred => &self.starred,
        }
    }

    pub fn postings(&self, token: &str) -> Option<&HashSet<usize>> {
        self.postings.get(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct IndexEngine;

impl IndexEngine {
    /// Deterministic, total function of the snapshot. The canonical
    /// array is ordered by key so rebuilds of equal maps are identical;
    /// partitions then sort stably by count descending.
    pub fn rebuild(map: &HashMap<String, VocabEntry>) -> IndexSnapshot {
        let mut entries: Vec<VocabEntry> = map.values().cloned().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        let mut snapshot = IndexSnapshot {
            entries,
            ..Default::default()
        };

        for (position, entry) in snapshot.entries.iter().enumerate() {
            snapshot.all.push(position);
            match entry.kind {
                EntryKind::Word => snapshot.word.push(position),
                EntryKind::Phrase => snapshot.phrase.push(position),
                EntryKind::Sentence => snapshot.sentence.push(position),
            }
            if entry.starred {
                snapshot.starred.push(position);
            }

            for token in tokenize(&entry.key, &entry.translation) {
                snapshot.postings.entry(token).or_default().insert(position);
            }
        }

        let entries = &snapshot.entries;
        for partition in [
            &mut snapshot.all,
            &mut snapshot.word,
            &mut snapshot.phrase,
            &mut snapshot.sentence,
            &mut snapshot.starred,
        ] {
            partition.sort_by(|&a, &b| entries[b].count.cmp(&entries[a].count));
        }

        snapshot
    }
}

/// Tokenization source is `key + " " + translation`, lowercased, split
/// on whitespace runs. Search uses the same rule on the query side.
pub fn tokenize(key: &str, translation: &str) -> Vec<String> {
    format!("{key} {translation}")
        .to_lowercase()
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordhoard_types::CategoryFilter;

    fn entry(key: &str, translation: &str, count: u32, starred: bool) -> VocabEntry {
        let mut e = VocabEntry::new(key, translation.to_string(), None);
        e.count = count;
        e.starred = starred;
        e
    }

    fn snapshot_of(entries: Vec<VocabEntry>) -> IndexSnapshot {
        let map: HashMap<String, VocabEntry> =
            entries.into_iter().map(|e| (e.key.clone(), e)).collect();
        IndexEngine::rebuild(&map)
    }

    #[test]
    fn partitions_are_exhaustive_and_starred_is_independent() {
        let snapshot = snapshot_of(vec![
            entry("hello", "你好", 3, true),
            entry("give up", "放弃", 1, false),
            entry("how are you?", "你好吗", 2, true),
            entry("cat", "猫", 5, false),
        ]);

        let by_kind = snapshot.partition(CategoryFilter::Word).len()
            + snapshot.partition(CategoryFilter::Phrase).len()
            + snapshot.partition(CategoryFilter::Sentence).len();
        assert_eq!(by_kind, snapshot.len());
        assert_eq!(snapshot.partition(CategoryFilter::Starred).len(), 2);
        assert_eq!(snapshot.partition(CategoryFilter::All).len(), 4);
    }

    #[test]
    fn partitions_sorted_by_count_descending() {
        let snapshot = snapshot_of(vec![
            entry("a", "甲", 1, false),
            entry("b", "乙", 9, false),
            entry("c", "丙", 5, false),
        ]);

        let counts: Vec<u32> = snapshot
            .partition(CategoryFilter::All)
            .iter()
            .map(|&i| snapshot.entries[i].count)
            .collect();
        assert_eq!(counts, vec![9, 5, 1]);
    }

    #[test]
    fn postings_cover_key_and_translation_tokens() {
        let snapshot = snapshot_of(vec![entry("give up", "fàng qì", 1, false)]);

        assert!(snapshot.postings("give").is_some());
        assert!(snapshot.postings("up").is_some());
        assert!(snapshot.postings("fàng").is_some());
        assert!(snapshot.postings("missing").is_none());
    }

    #[test]
    fn rebuild_of_empty_map_is_empty() {
        let snapshot = IndexEngine::rebuild(&HashMap::new());
        assert!(snapshot.is_empty());
        assert!(snapshot.partition(CategoryFilter::All).is_empty());
    }
}
