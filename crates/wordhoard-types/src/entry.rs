use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Normalize user-selected text into the map key: lowercase, trimmed.
pub fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// What kind of vocabulary item a key is. Decided once at creation time
/// from the key alone and never recomputed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Word,
    Phrase,
    Sentence,
}

impl EntryKind {
    /// Word iff a single token of letters/hyphens/apostrophes, phrase iff
    /// several such tokens, sentence for anything else (digits,
    /// punctuation, non-latin script).
    pub fn classify(text: &str) -> Self {
        let trimmed = text.trim();
        if !is_word_or_phrase(trimmed) {
            return EntryKind::Sentence;
        }
        if trimmed.split_whitespace().count() == 1 {
            EntryKind::Word
        } else {
            EntryKind::Phrase
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Word => "word",
            EntryKind::Phrase => "phrase",
            EntryKind::Sentence => "sentence",
        }
    }
}

/// True when the text contains only letters, whitespace, hyphens and
/// apostrophes, with at least one non-whitespace character.
pub fn is_word_or_phrase(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '\'')
        && trimmed.chars().any(|c| !c.is_whitespace())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Determiner,
    Article,
    Numeral,
    Auxiliary,
    Modal,
}

impl PartOfSpeech {
    /// Parse a tag as remote dictionary APIs report it. Unknown tags map
    /// to None rather than an error; the field is optional everywhere.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "noun" => Some(Self::Noun),
            "verb" => Some(Self::Verb),
            "adjective" => Some(Self::Adjective),
            "adverb" => Some(Self::Adverb),
            "pronoun" => Some(Self::Pronoun),
            "preposition" => Some(Self::Preposition),
            "conjunction" => Some(Self::Conjunction),
            "interjection" => Some(Self::Interjection),
            "determiner" => Some(Self::Determiner),
            "article" => Some(Self::Article),
            "numeral" => Some(Self::Numeral),
            "auxiliary" => Some(Self::Auxiliary),
            "modal" => Some(Self::Modal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Pronoun => "pronoun",
            Self::Preposition => "preposition",
            Self::Conjunction => "conjunction",
            Self::Interjection => "interjection",
            Self::Determiner => "determiner",
            Self::Article => "article",
            Self::Numeral => "numeral",
            Self::Auxiliary => "auxiliary",
            Self::Modal => "modal",
        }
    }
}

/// One learned vocabulary item, keyed by the lowercase trimmed source
/// text. The whole vocabulary map is persisted under a single storage
/// key, so this struct round-trips through JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    /// Case-insensitive identity of the source text.
    #[serde(rename = "word", default)]
    pub key: String,
    /// Original-case display text, captured once.
    #[serde(default)]
    pub source_text: String,
    pub translation: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<PartOfSpeech>,
    pub count: u32,
    #[serde(default)]
    pub starred: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub first_used: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_used: OffsetDateTime,
}

impl VocabEntry {
    /// Build a fresh entry from a user capture. Kind is derived from the
    /// key here and never again.
    pub fn new(source_text: &str, translation: String, part_of_speech: Option<PartOfSpeech>) -> Self {
        let key = normalize_key(source_text);
        let now = OffsetDateTime::now_utc();
        Self {
            kind: EntryKind::classify(&key),
            key,
            source_text: source_text.trim().to_string(),
            translation,
            part_of_speech,
            count: 1,
            starred: false,
            first_used: now,
            last_used: now,
        }
    }

    /// Re-produced by a user action: bump the counter and touch
    /// `last_used`. `first_used` stays put.
    pub fn touch(&mut self) {
        self.count += 1;
        self.last_used = OffsetDateTime::now_utc();
    }

    /// Fill in part of speech if it was never set. An existing value is
    /// never overwritten.
    pub fn fill_part_of_speech(&mut self, pos: Option<PartOfSpeech>) {
        if self.part_of_speech.is_none() {
            self.part_of_speech = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_single_token_is_word() {
        assert_eq!(EntryKind::classify("hello"), EntryKind::Word);
        assert_eq!(EntryKind::classify("mother-in-law"), EntryKind::Word);
        assert_eq!(EntryKind::classify("don't"), EntryKind::Word);
    }

    #[test]
    fn classify_multi_token_is_phrase() {
        assert_eq!(EntryKind::classify("give up"), EntryKind::Phrase);
        assert_eq!(EntryKind::classify("  state of the art "), EntryKind::Phrase);
    }

    #[test]
    fn classify_punctuation_or_digits_is_sentence() {
        assert_eq!(EntryKind::classify("Hello, world"), EntryKind::Sentence);
        assert_eq!(EntryKind::classify("route 66"), EntryKind::Sentence);
        assert_eq!(EntryKind::classify("你好"), EntryKind::Sentence);
    }

    #[test]
    fn kind_is_fixed_at_creation() {
        let entry = VocabEntry::new("Hello World", "你好世界".into(), None);
        assert_eq!(entry.key, "hello world");
        assert_eq!(entry.source_text, "Hello World");
        assert_eq!(entry.kind, EntryKind::Phrase);
        assert_eq!(entry.count, 1);
        assert!(!entry.starred);
        assert_eq!(entry.first_used, entry.last_used);
    }

    #[test]
    fn part_of_speech_survives_fill() {
        let mut entry = VocabEntry::new("run", "跑".into(), Some(PartOfSpeech::Verb));
        entry.fill_part_of_speech(Some(PartOfSpeech::Noun));
        assert_eq!(entry.part_of_speech, Some(PartOfSpeech::Verb));

        let mut entry = VocabEntry::new("run", "跑".into(), None);
        entry.fill_part_of_speech(Some(PartOfSpeech::Noun));
        assert_eq!(entry.part_of_speech, Some(PartOfSpeech::Noun));
    }

    #[test]
    fn serde_uses_original_field_names() {
        let entry = VocabEntry::new("cat", "猫".into(), Some(PartOfSpeech::Noun));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["word"], "cat");
        assert_eq!(json["type"], "word");
        assert_eq!(json["partOfSpeech"], "noun");
        assert!(json["firstUsed"].is_string());

        let back: VocabEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back.key, "cat");
        assert_eq!(back.kind, EntryKind::Word);
    }
}
