use wordhoard_types::PartOfSpeech;

pub mod cache;
pub mod chain;
pub mod providers;

pub use cache::{CachedPhonetics, SessionCache};
pub use chain::TranslatorChain;
pub use providers::{DictApiPhonetics, FallbackProvider, SignedProvider};

/// User-visible sentinel shown when every provider fails. Surfaced as a
/// value, never as an error reaching the UI loop.
pub const TRANSLATION_FAILED: &str = "翻译失败";

/// Translation provider interface.
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}

/// Phonetic/part-of-speech lookup interface.
#[async_trait::async_trait]
pub trait Phonetics: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<PhoneticInfo, TranslateError>;
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneticInfo {
    pub phonetic: Option<String>,
    pub part_of_speech: Option<PartOfSpeech>,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("authentication error")]
    AuthenticationError,
}
