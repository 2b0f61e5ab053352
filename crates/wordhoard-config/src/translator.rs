use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Signed primary provider credentials. Empty key disables the
    /// primary and goes straight to the fallback.
    pub app_key: String,
    pub app_secret: String,
    pub api_url: String,
    /// Free fallback endpoint, queried when the primary fails.
    pub fallback_url: String,
    /// Dictionary endpoint for phonetics and part-of-speech lookups.
    pub dictionary_url: String,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        let app_key = env::var("WORDHOARD_APP_KEY").unwrap_or_default();
        let app_secret = env::var("WORDHOARD_APP_SECRET").unwrap_or_default();

        let api_url = env::var("WORDHOARD_API_URL")
            .unwrap_or_else(|_| "https://openapi.youdao.com/api".to_string());
        let fallback_url = env::var("WORDHOARD_FALLBACK_URL")
            .unwrap_or_else(|_| "https://api.mymemory.translated.net/get".to_string());
        let dictionary_url = env::var("WORDHOARD_DICTIONARY_URL")
            .unwrap_or_else(|_| "https://api.dictionaryapi.dev/api/v2/entries/en".to_string());

        TranslatorConfig {
            app_key,
            app_secret,
            api_url,
            fallback_url,
            dictionary_url,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
