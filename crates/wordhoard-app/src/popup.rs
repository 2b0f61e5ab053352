use std::sync::Arc;

use tokio::sync::broadcast;
use wordhoard_config::ui::UiConfig;
use wordhoard_core::{
    QueryService, Storage, StorageChange, StoreError, VOCAB_KEY, VocabularyStore, page_slice,
};
use wordhoard_io::{ImportMode, ImportStats};
use wordhoard_learn::ProgressStore;
use wordhoard_types::{CategoryFilter, SortMode, VocabEntry};

/// Headline numbers for the overview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeStats {
    pub total: usize,
    pub words: usize,
    pub phrases: usize,
    pub sentences: usize,
    pub starred: usize,
    /// Sum of usage counts over the whole vocabulary.
    pub total_uses: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

/// One open popup: current filter, search term, sort and page over the
/// shared vocabulary. Holds its own query service and resynchronizes
/// from storage change notifications rather than assuming it is the
/// only writer.
pub struct PopupSession {
    store: VocabularyStore,
    progress: ProgressStore,
    query: QueryService,
    changes: broadcast::Receiver<StorageChange>,
    filter: CategoryFilter,
    term: String,
    sort: Option<SortMode>,
    page: usize,
    page_size: usize,
    results: Vec<VocabEntry>,
}

impl PopupSession {
    pub async fn open(storage: Arc<dyn Storage>, ui: &UiConfig) -> Result<Self, StoreError> {
        let changes = storage.subscribe();
        let mut session = Self {
            store: VocabularyStore::new(storage.clone()),
            progress: ProgressStore::new(storage),
            query: QueryService::new(ui.search_cache_capacity),
            changes,
            filter: CategoryFilter::All,
            term: String::new(),
            sort: None,
            page: 0,
            page_size: ui.page_size,
            results: Vec::new(),
        };
        session.reload().await?;
        Ok(session)
    }

    /// Re-read the vocabulary and recompute the current view. Runs at
    /// open and after every relevant change notification.
    pub async fn reload(&mut self) -> Result<(), StoreError> {
        let map = self.store.load().await?;
        self.query.refresh(&map);
        self.requery();
        Ok(())
    }

    /// Drain pending change notifications; reload once if the
    /// vocabulary key was touched by anyone (including ourselves).
    pub async fn pump_changes(&mut self) -> Result<bool, StoreError> {
        let mut vocab_changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(change) => vocab_changed |= change.key == VOCAB_KEY,
                Err(broadcast::error::TryRecvError::Lagged(_)) => vocab_changed = true,
                Err(_) => break,
            }
        }
        if vocab_changed {
            self.reload().await?;
        }
        Ok(vocab_changed)
    }

    fn requery(&mut self) {
        self.results = self.query.query(self.filter, &self.term, self.sort);
        let last = self.page_count().saturating_sub(1);
        self.page = self.page.min(last);
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        self.page = 0;
        self.requery();
    }

    pub fn set_search(&mut self, term: &str) {
        self.term = term.to_string();
        self.page = 0;
        self.requery();
    }

    pub fn set_sort(&mut self, sort: Option<SortMode>) {
        self.sort = sort;
        self.page = 0;
        self.requery();
    }

    pub fn page(&self) -> &[VocabEntry] {
        page_slice(&self.results, self.page, self.page_size)
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        // Same zero-size guard as page_slice; a zero page size shows
        // nothing rather than dividing by zero.
        if self.results.is_empty() || self.page_size == 0 {
            1
        } else {
            self.results.len().div_ceil(self.page_size)
        }
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn stats(&self) -> HomeStats {
        let snapshot = self.query.snapshot();
        let counts = self.query.counts();
        HomeStats {
            total: counts[&CategoryFilter::All],
            words: counts[&CategoryFilter::Word],
            phrases: counts[&CategoryFilter::Phrase],
            sentences: counts[&CategoryFilter::Sentence],
            starred: counts[&CategoryFilter::Starred],
            total_uses: snapshot.entries.iter().map(|e| e.count as u64).sum(),
        }
    }

    pub fn recent(&self, limit: usize) -> Vec<VocabEntry> {
        self.query.recent(limit)
    }

    pub async fn toggle_star(&mut self, key: &str) -> Result<(), StoreError> {
        self.store.toggle_star(key).await?;
        self.reload().await
    }

    /// Deleting a word also drops its learning progress; orphaned
    /// progress records would otherwise live forever.
    pub async fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.store.remove(key).await?;
        let map = self.store.load().await?;
        let live: Vec<&str> = map.keys().map(String::as_str).collect();
        self.progress.prune(&live).await?;
        self.reload().await
    }

    pub async fn clear_all(&mut self) -> Result<(), StoreError> {
        self.store.clear().await?;
        self.progress.prune(&[]).await?;
        self.reload().await
    }

    pub async fn export(&self, format: ExportFormat, filter: CategoryFilter) -> anyhow::Result<String> {
        let map = self.store.load().await?;
        Ok(match format {
            ExportFormat::Json => wordhoard_io::export_json(&map, filter)?,
            ExportFormat::Csv => wordhoard_io::export_csv(&map, filter),
        })
    }

    /// Validate and apply a backup file. Nothing is written unless the
    /// whole file parses and validates.
    pub async fn import(
        &mut self,
        input: &str,
        format: ExportFormat,
        mode: ImportMode,
    ) -> anyhow::Result<ImportStats> {
        let imported = match format {
            ExportFormat::Json => wordhoard_io::parse_json(input)?,
            ExportFormat::Csv => wordhoard_io::parse_csv(input)?,
        };

        let mut map = self.store.load().await?;
        let stats = wordhoard_io::apply_import(&mut map, imported, mode);
        self.store.save(&map).await?;
        self.reload().await?;
        Ok(stats)
    }
}
