use regex::Regex;
use wordhoard_config::highlight::HighlightConfig;
use wordhoard_types::{EntryKind, VocabEntry};

use crate::dom::{Document, Element, Marker, Node};
use crate::plan::{Segment, compile_pattern, plan_segments};

/// Element subtrees a scan never descends into: non-prose content, plus
/// anything where rewriting text would break the page.
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "textarea", "input", "iframe", "img", "video", "audio",
    "canvas", "svg", "code", "pre",
];

/// Rewrites matching page text into marker spans. Stateless between
/// passes: every scan strips the previous markers first and rebuilds
/// from the current vocabulary, so the pass is idempotent and markers
/// never nest.
pub struct HighlightEngine {
    config: HighlightConfig,
}

impl HighlightEngine {
    pub fn new(config: HighlightConfig) -> Self {
        Self { config }
    }

    /// Allow-list check, consulted before any scan or selection
    /// handling. "*" opens every origin; otherwise a host matches an
    /// allowed domain exactly or as one of its subdomains.
    pub fn origin_allowed(&self, host: &str) -> bool {
        self.config.allowed_domains.iter().any(|domain| {
            domain == "*" || host == domain || host.ends_with(&format!(".{domain}"))
        })
    }

    /// One full highlight pass over the document. Only word and phrase
    /// entries are considered, capped per pass to bound work on large
    /// vocabularies. Returns the number of markers inserted.
    pub fn scan(&self, doc: &mut Document, entries: &[VocabEntry]) -> usize {
        doc.strip_markers();

        let candidates: Vec<&VocabEntry> = entries
            .iter()
            .filter(|e| matches!(e.kind, EntryKind::Word | EntryKind::Phrase))
            .take(self.config.max_entries_per_scan)
            .collect();

        let mut next_id = 0;
        for entry in candidates {
            let Some(pattern) = compile_pattern(&entry.key) else {
                tracing::warn!(key = %entry.key, "unusable highlight pattern, skipping");
                continue;
            };
            rewrite_element(&mut doc.root, entry, &pattern, &mut next_id);
        }

        tracing::debug!(markers = next_id, "highlight pass complete");
        next_id
    }

    /// Delegated interaction entry point: the region root resolves a
    /// click to marker metadata. Callers needing a tooltip anchor must
    /// take it from this marker before the next scan replaces it.
    pub fn dispatch_click<'d>(&self, doc: &'d Document, marker_id: usize) -> Option<&'d Marker> {
        doc.find_marker(marker_id)
    }
}

fn rewrite_element(element: &mut Element, entry: &VocabEntry, pattern: &Regex, next_id: &mut usize) {
    let mut rewritten: Vec<Node> = Vec::with_capacity(element.children.len());

    for child in element.children.drain(..) {
        match child {
            Node::Text(text) => match plan_segments(&text, pattern) {
                Some(segments) => {
                    for segment in segments {
                        match segment {
                            Segment::Plain(plain) => rewritten.push(Node::Text(plain)),
                            Segment::Hit(hit) => {
                                let marker = Marker {
                                    id: *next_id,
                                    word: entry.key.clone(),
                                    translation: entry.translation.clone(),
                                    count: entry.count,
                                    part_of_speech: entry.part_of_speech,
                                };
                                *next_id += 1;
                                rewritten.push(Node::Element(Element::marker_span(marker, &hit)));
                            }
                        }
                    }
                }
                None => rewritten.push(Node::Text(text)),
            },
            Node::Element(mut inner) => {
                // Never rewrite inside existing markers or skip-listed
                // subtrees.
                if inner.marker.is_none() && !SKIP_TAGS.contains(&inner.tag.as_str()) {
                    rewrite_element(&mut inner, entry, pattern, next_id);
                }
                rewritten.push(Node::Element(inner));
            }
        }
    }

    element.children = rewritten;
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordhoard_types::PartOfSpeech;

    fn engine() -> HighlightEngine {
        HighlightEngine::new(HighlightConfig {
            max_entries_per_scan: 50,
            selection_max_chars: 100,
            capture_debounce_ms: 150,
            allowed_domains: vec!["*".to_string()],
        })
    }

    fn entry(key: &str, translation: &str, count: u32) -> VocabEntry {
        let mut e = VocabEntry::new(key, translation.to_string(), None);
        e.count = count;
        e
    }

    fn page(text: &str) -> Document {
        Document::new(Element::with_children(
            "body",
            vec![Node::Text(text.to_string())],
        ))
    }

    #[test]
    fn marks_every_occurrence_and_preserves_other_text() {
        let mut doc = page("Hello world, hello again");
        let inserted = engine().scan(&mut doc, &[entry("hello", "你好", 3)]);

        assert_eq!(inserted, 2);
        let markers = doc.markers();
        assert_eq!(markers.len(), 2);
        for marker in &markers {
            assert_eq!(marker.word, "hello");
            assert_eq!(marker.translation, "你好");
            assert_eq!(marker.count, 3);
        }
        // Untouched text survives verbatim.
        assert_eq!(doc.text_content(), "Hello world, hello again");
        assert!(matches!(
            &doc.root.children[1],
            Node::Text(t) if t == " world, "
        ));
    }

    #[test]
    fn scan_is_idempotent() {
        let mut doc = page("tip of the iceberg");
        let entries = [entry("iceberg", "冰山", 1), entry("tip", "尖端", 2)];

        engine().scan(&mut doc, &entries);
        let first_text = doc.text_content();
        let first_markers = doc.marker_count();

        engine().scan(&mut doc, &entries);
        assert_eq!(doc.text_content(), first_text);
        assert_eq!(doc.marker_count(), first_markers);
    }

    #[test]
    fn sentences_are_never_highlighted() {
        let mut doc = page("How are you? fine");
        let mut sentence = entry("how are you?", "你好吗", 1);
        sentence.count = 9;
        assert_eq!(engine().scan(&mut doc, &[sentence]), 0);
    }

    #[test]
    fn skip_tags_are_left_alone() {
        let mut doc = Document::new(Element::with_children(
            "body",
            vec![
                Node::Element(Element::with_children(
                    "script",
                    vec![Node::Text("hello()".into())],
                )),
                Node::Text("hello".into()),
            ],
        ));

        assert_eq!(engine().scan(&mut doc, &[entry("hello", "你好", 1)]), 1);
    }

    #[test]
    fn entry_cap_bounds_work_per_pass() {
        let config = HighlightConfig {
            max_entries_per_scan: 1,
            selection_max_chars: 100,
            capture_debounce_ms: 150,
            allowed_domains: vec!["*".to_string()],
        };
        let engine = HighlightEngine::new(config);

        let mut doc = page("alpha beta");
        engine.scan(&mut doc, &[entry("alpha", "一", 1), entry("beta", "二", 1)]);
        let words: Vec<String> = doc.markers().iter().map(|m| m.word.clone()).collect();
        assert_eq!(words, vec!["alpha".to_string()]);
    }

    #[test]
    fn phrase_markers_do_not_nest_word_markers() {
        // "give up" runs first; "up" must not split the phrase marker.
        let mut doc = page("never give up");
        let entries = [entry("give up", "放弃", 5), entry("up", "上", 1)];
        engine().scan(&mut doc, &entries);

        let words: Vec<String> = doc.markers().iter().map(|m| m.word.clone()).collect();
        assert_eq!(words, vec!["give up".to_string()]);
        assert_eq!(doc.text_content(), "never give up");
    }

    #[test]
    fn dispatch_click_resolves_metadata() {
        let mut doc = page("hello there");
        let mut e = entry("hello", "你好", 2);
        e.part_of_speech = Some(PartOfSpeech::Interjection);
        let engine = engine();
        engine.scan(&mut doc, &[e]);

        let marker = engine.dispatch_click(&doc, 0).unwrap();
        assert_eq!(marker.word, "hello");
        assert_eq!(marker.part_of_speech, Some(PartOfSpeech::Interjection));
        assert!(engine.dispatch_click(&doc, 99).is_none());
    }

    #[test]
    fn origin_allow_list() {
        let mut config = HighlightConfig {
            max_entries_per_scan: 50,
            selection_max_chars: 100,
            capture_debounce_ms: 150,
            allowed_domains: vec!["example.com".to_string()],
        };
        let engine = HighlightEngine::new(config.clone());
        assert!(engine.origin_allowed("example.com"));
        assert!(engine.origin_allowed("news.example.com"));
        assert!(!engine.origin_allowed("example.org"));

        config.allowed_domains = vec!["*".to_string()];
        assert!(HighlightEngine::new(config).origin_allowed("anything.net"));
    }
}
