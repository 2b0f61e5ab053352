use regex::Regex;

/// One piece of a text node after matching: untouched text, or a hit to
/// wrap in a marker. Hits keep the page's original casing.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Plain(String),
    Hit(String),
}

/// Case-insensitive, word-boundary-anchored pattern for one vocabulary
/// key. The key is escaped first, so regex metacharacters in captured
/// text match literally. None if the escaped key still fails to compile.
pub fn compile_pattern(key: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(key))).ok()
}

/// Pure planner half of the highlight rewrite: split one text node's
/// content into plain and hit segments. Returns None when nothing
/// matches, so the caller leaves the node untouched. Concatenating the
/// segments always reproduces the input exactly.
pub fn plan_segments(text: &str, pattern: &Regex) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for found in pattern.find_iter(text) {
        if found.start() > last_end {
            segments.push(Segment::Plain(text[last_end..found.start()].to_string()));
        }
        segments.push(Segment::Hit(found.as_str().to_string()));
        last_end = found.end();
    }

    if segments.is_empty() {
        return None;
    }
    if last_end < text.len() {
        segments.push(Segment::Plain(text[last_end..].to_string()));
    }
    Some(segments)
}
