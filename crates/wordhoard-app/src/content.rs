use std::sync::Arc;

use wordhoard_config::Config;
use wordhoard_core::{Storage, StoreError, VocabularyStore};
use wordhoard_highlight::{
    CaptureOutcome, Document, HighlightEngine, SelectionCapture, SelectionSnapshot,
};
use wordhoard_translate::{CachedPhonetics, PhoneticInfo, SessionCache, TranslatorChain};
use wordhoard_types::{EntryKind, TooltipData, VocabEntry, is_word_or_phrase, normalize_key};

/// Everything one page session holds: the highlight engine and its
/// document, the selection state machine, the translate chain with its
/// page-lifetime caches, and a handle to the shared vocabulary.
pub struct ContentSession {
    engine: HighlightEngine,
    capture: SelectionCapture,
    store: VocabularyStore,
    chain: TranslatorChain,
    phonetics: CachedPhonetics,
    translations: SessionCache<String>,
    doc: Document,
}

impl ContentSession {
    pub fn new(
        config: &Config,
        storage: Arc<dyn Storage>,
        chain: TranslatorChain,
        phonetics: CachedPhonetics,
        doc: Document,
    ) -> Self {
        Self {
            engine: HighlightEngine::new(config.highlight.clone()),
            capture: SelectionCapture::new(&config.highlight),
            store: VocabularyStore::new(storage),
            chain,
            phonetics,
            translations: SessionCache::new(),
            doc,
        }
    }

    /// Gate on the configured domain allow-list before doing anything
    /// on a page.
    pub fn origin_allowed(&self, host: &str) -> bool {
        self.engine.origin_allowed(host)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Initial pass after page load, and again on any vocabulary
    /// change. Returns the number of markers now in the page.
    pub async fn resync(&mut self) -> Result<usize, StoreError> {
        let map = self.store.load().await?;
        let mut entries: Vec<VocabEntry> = map.into_values().collect();
        // Most used first, so the per-pass cap keeps the words that
        // matter.
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        Ok(self.engine.scan(&mut self.doc, &entries))
    }

    pub fn offer_selection(&mut self, snapshot: &SelectionSnapshot) -> CaptureOutcome {
        self.capture.offer(snapshot)
    }

    pub fn cancel_selection(&mut self) {
        self.capture.cancel();
    }

    /// The confirm gesture: translate the captured selection, persist
    /// it, rescan, and hand back tooltip content. Translation failure
    /// degrades to a sentinel value; this only errors on storage.
    pub async fn confirm_translate(
        &mut self,
        editable_focused: bool,
    ) -> Result<Option<TooltipData>, StoreError> {
        let Some(text) = self.capture.confirm(editable_focused) else {
            return Ok(None);
        };

        let translation = match self.translations.get(&text) {
            Some(cached) => cached,
            None => {
                let result = self.chain.translate_or_sentinel(&text).await;
                if result.provider != "none" {
                    self.translations.insert(&text, result.text.clone());
                }
                result.text
            }
        };

        // Phonetics only make sense for plain words and phrases.
        let info = if is_word_or_phrase(&text) {
            self.phonetics.lookup(&normalize_key(&text)).await
        } else {
            PhoneticInfo::default()
        };

        let outcome = self
            .store
            .upsert(&text, translation, info.part_of_speech)
            .await;
        self.capture.complete();
        let entry = outcome?;

        if matches!(entry.kind, EntryKind::Word | EntryKind::Phrase) {
            self.resync().await?;
        }

        Ok(Some(TooltipData {
            word: entry.key,
            translation: entry.translation,
            count: entry.count,
            phonetic: info.phonetic,
            part_of_speech: entry.part_of_speech,
            anchor: None,
        }))
    }

    /// A click on an existing marker: bump the count and show the
    /// review tooltip. Marker metadata and the anchor id are taken
    /// before the rescan invalidates them.
    pub async fn marker_clicked(
        &mut self,
        marker_id: usize,
    ) -> Result<Option<TooltipData>, StoreError> {
        let Some(marker) = self.engine.dispatch_click(&self.doc, marker_id) else {
            tracing::debug!(marker_id, "click on unknown marker ignored");
            return Ok(None);
        };
        let word = marker.word.clone();
        let anchor = Some(marker.id);

        let Some(entry) = self.store.record_click(&word).await? else {
            // Deleted in another context; the rescan clears the stale
            // marker.
            self.resync().await?;
            return Ok(None);
        };

        let info = self.phonetics.lookup(&entry.key).await;
        if let Some(pos) = info.part_of_speech
            && entry.part_of_speech.is_none()
        {
            self.store.fill_part_of_speech(&entry.key, pos).await?;
        }

        self.resync().await?;

        Ok(Some(TooltipData {
            word: entry.key,
            translation: entry.translation,
            count: entry.count,
            phonetic: info.phonetic,
            part_of_speech: entry.part_of_speech.or(info.part_of_speech),
            anchor,
        }))
    }
}
