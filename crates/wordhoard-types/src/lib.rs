pub mod entry;
pub mod events;
pub mod query;
pub mod settings;

pub use entry::{EntryKind, PartOfSpeech, VocabEntry, is_word_or_phrase, normalize_key};
pub use events::{AppEvent, TooltipData};
pub use query::{CategoryFilter, SortMode};
pub use settings::UserSettings;
