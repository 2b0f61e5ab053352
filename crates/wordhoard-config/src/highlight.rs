use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Most distinct vocabulary entries considered in one scan pass.
    /// Entries beyond the cap simply wait for a later pass.
    pub max_entries_per_scan: usize,
    /// Selections this long or longer are never captured.
    pub selection_max_chars: usize,
    /// Quiet period after pointer-up before a selection is captured.
    pub capture_debounce_ms: u64,
    /// Domains the engine is allowed to touch. "*" allows everything.
    pub allowed_domains: Vec<String>,
}

impl HighlightConfig {
    pub fn new() -> Self {
        let max_entries_per_scan = env::var("WORDHOARD_MAX_HIGHLIGHTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        let selection_max_chars = env::var("WORDHOARD_SELECTION_MAX_CHARS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let capture_debounce_ms = env::var("WORDHOARD_CAPTURE_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(150);

        let allowed_domains = env::var("WORDHOARD_ALLOWED_DOMAINS")
            .map(|v| v.split(',').map(|d| d.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        HighlightConfig {
            max_entries_per_scan,
            selection_max_chars,
            capture_debounce_ms,
            allowed_domains,
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self::new()
    }
}
