use unicode_normalization::UnicodeNormalization;
use wordhoard_config::highlight::HighlightConfig;

/// What the page hands us on pointer-up, after the capture debounce.
/// `text` is the selection's plain text with any markers inside the
/// range already flattened to their text content.
#[derive(Debug, Clone)]
pub struct SelectionSnapshot {
    pub text: String,
    /// True for a degenerate click whose range starts and ends inside
    /// one existing highlight marker (that is a review click, not a new
    /// selection).
    pub inside_single_marker: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState {
    Idle,
    /// Text captured, waiting for the explicit confirm gesture.
    Selected(String),
    /// Confirm received; the translate pipeline is running.
    Translating(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured,
    /// Empty, too long, or a marker click; state is unchanged.
    Rejected,
}

/// Confirm-gated selection state machine: Idle -> Selected ->
/// Translating -> Idle. Translation fires only on an explicit Enter
/// with no editable element focused; everything else discards.
pub struct SelectionCapture {
    state: SelectionState,
    max_chars: usize,
}

impl SelectionCapture {
    pub fn new(config: &HighlightConfig) -> Self {
        Self {
            state: SelectionState::Idle,
            max_chars: config.selection_max_chars,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Offer a debounced pointer-up selection. Accepts non-empty text
    /// strictly shorter than the cap that is not a marker click; a new
    /// capture replaces any previously captured selection.
    pub fn offer(&mut self, snapshot: &SelectionSnapshot) -> CaptureOutcome {
        if matches!(self.state, SelectionState::Translating(_)) {
            return CaptureOutcome::Rejected;
        }

        let text = clean_selection(&snapshot.text);
        if text.is_empty() || text.chars().count() >= self.max_chars {
            return CaptureOutcome::Rejected;
        }
        if snapshot.inside_single_marker {
            return CaptureOutcome::Rejected;
        }

        self.state = SelectionState::Selected(text);
        CaptureOutcome::Captured
    }

    /// Enter pressed. Moves to Translating and hands back the text to
    /// translate, unless an editable element holds focus or nothing is
    /// captured.
    pub fn confirm(&mut self, editable_focused: bool) -> Option<String> {
        if editable_focused {
            return None;
        }
        match std::mem::replace(&mut self.state, SelectionState::Idle) {
            SelectionState::Selected(text) => {
                self.state = SelectionState::Translating(text.clone());
                Some(text)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Escape or a click elsewhere: discard a captured selection
    /// without translating. A running translation is not interrupted.
    pub fn cancel(&mut self) {
        if matches!(self.state, SelectionState::Selected(_)) {
            self.state = SelectionState::Idle;
        }
    }

    /// The translate+persist+display sequence finished, successfully or
    /// not. State clears unconditionally.
    pub fn complete(&mut self) {
        self.state = SelectionState::Idle;
    }
}

/// Normalize captured text the way the translation pipeline expects it:
/// NFKC, newlines dropped, surrounding whitespace trimmed.
fn clean_selection(text: &str) -> String {
    text.nfkc()
        .collect::<String>()
        .replace(['\n', '\r'], "")
        .trim()
        .to_string()
}
