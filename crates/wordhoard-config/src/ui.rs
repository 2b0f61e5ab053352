use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Entries shown per page in list views.
    pub page_size: usize,
    /// Memoized (filter, term) result lists kept before FIFO eviction.
    pub search_cache_capacity: usize,
    /// Debounce for search box input.
    pub search_debounce_ms: u64,
}

impl UiConfig {
    pub fn new() -> Self {
        let page_size = env::var("WORDHOARD_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        let search_cache_capacity = env::var("WORDHOARD_SEARCH_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let search_debounce_ms = env::var("WORDHOARD_SEARCH_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(150);

        UiConfig {
            page_size,
            search_cache_capacity,
            search_debounce_ms,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self::new()
    }
}
