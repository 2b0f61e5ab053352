pub mod cache;
pub mod error;
pub mod index;
pub mod query;
pub mod settings;
pub mod storage;
pub mod store;

pub use cache::SearchCache;
pub use error::StoreError;
pub use index::{IndexEngine, IndexSnapshot};
pub use query::{QueryService, page_slice};
pub use settings::SettingsStore;
pub use storage::{MemoryStorage, PROGRESS_KEY, SETTINGS_KEY, Storage, StorageChange, VOCAB_KEY};
pub use store::VocabularyStore;
