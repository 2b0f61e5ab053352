use serde::{Deserialize, Serialize};

use crate::entry::EntryKind;

/// Which slice of the vocabulary a list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    All,
    Word,
    Phrase,
    Sentence,
    Starred,
}

impl CategoryFilter {
    /// The kind a type-based filter selects; None for `All` and
    /// `Starred`, which cut across kinds.
    pub fn kind(&self) -> Option<EntryKind> {
        match self {
            CategoryFilter::Word => Some(EntryKind::Word),
            CategoryFilter::Phrase => Some(EntryKind::Phrase),
            CategoryFilter::Sentence => Some(EntryKind::Sentence),
            CategoryFilter::All | CategoryFilter::Starred => None,
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "word" | "words" => Ok(Self::Word),
            "phrase" | "phrases" => Ok(Self::Phrase),
            "sentence" | "sentences" => Ok(Self::Sentence),
            "starred" => Ok(Self::Starred),
            other => Err(format!("unknown category filter: {other}")),
        }
    }
}

/// Explicit sort requested by the caller. When absent, category views
/// keep count-descending order and searches keep relevance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Usage count, descending.
    Count,
    /// Most recently used first.
    LastUsed,
    /// Key, lexicographic ascending.
    Alphabetical,
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "lastused" | "last-used" | "recent" => Ok(Self::LastUsed),
            "word" | "key" | "alpha" | "alphabetical" => Ok(Self::Alphabetical),
            other => Err(format!("unknown sort mode: {other}")),
        }
    }
}
