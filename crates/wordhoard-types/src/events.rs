use crate::entry::PartOfSpeech;

/// Events exchanged between the session loops and their surrounding
/// context (page hooks, popup UI).
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Pointer released with a live selection; raw selection text
    /// follows after the capture debounce.
    SelectionCaptured(String),
    /// Explicit confirm gesture (Enter). Carries whether an editable
    /// element held focus, which suppresses translation.
    ConfirmTranslate { editable_focused: bool },
    /// Escape or click elsewhere; discard the captured selection.
    CancelSelection,
    /// A highlight marker was clicked, identified by its scan-local id.
    MarkerClicked(usize),
    /// The persisted vocabulary map changed in some execution context.
    VocabularyChanged,
    /// Result to surface next to the source of the interaction.
    ShowTooltip(TooltipData),
}

/// Everything a review tooltip displays for one word.
#[derive(Debug, Clone)]
pub struct TooltipData {
    pub word: String,
    pub translation: String,
    pub count: u32,
    pub phonetic: Option<String>,
    pub part_of_speech: Option<PartOfSpeech>,
    /// Scan-local id of the marker the tooltip anchors to, captured
    /// before any rescan replaces the marker. None for fresh
    /// selections that have no marker yet.
    pub anchor: Option<usize>,
}
