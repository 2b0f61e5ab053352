use wordhoard_types::PartOfSpeech;

/// Metadata attached to one injected highlight marker. Markers are
/// transient: a scan pass removes every previous marker and builds a
/// fresh set, so ids are only meaningful until the next pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Scan-local id, assigned sequentially within one pass.
    pub id: usize,
    pub word: String,
    pub translation: String,
    pub count: u32,
    pub part_of_speech: Option<PartOfSpeech>,
}

/// Lightweight stand-in for the page DOM the content script rewrites:
/// just enough structure to express text nodes, element subtrees and
/// injected marker spans.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub children: Vec<Node>,
    /// Present iff this element is an injected highlight marker.
    pub marker: Option<Marker>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            children: Vec::new(),
            marker: None,
        }
    }

    pub fn with_children(tag: &str, children: Vec<Node>) -> Self {
        Self {
            tag: tag.to_string(),
            children,
            marker: None,
        }
    }

    pub fn marker_span(marker: Marker, text: &str) -> Self {
        Self {
            tag: "span".to_string(),
            children: vec![Node::Text(text.to_string())],
            marker: Some(marker),
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn text_content(&self) -> String {
        self.root.text_content()
    }

    /// Replace every marker with its plain text content and merge the
    /// resulting adjacent text nodes. Restores the clean baseline a scan
    /// pass starts from; running it twice is a no-op.
    pub fn strip_markers(&mut self) {
        strip_markers_in(&mut self.root);
        normalize(&mut self.root);
    }

    pub fn markers(&self) -> Vec<&Marker> {
        let mut found = Vec::new();
        collect_markers(&self.root, &mut found);
        found
    }

    pub fn marker_count(&self) -> usize {
        self.markers().len()
    }

    pub fn find_marker(&self, id: usize) -> Option<&Marker> {
        self.markers().into_iter().find(|m| m.id == id)
    }
}

fn strip_markers_in(element: &mut Element) {
    let mut rewritten = Vec::with_capacity(element.children.len());
    for child in element.children.drain(..) {
        match child {
            Node::Element(inner) if inner.marker.is_some() => {
                rewritten.push(Node::Text(inner.text_content()));
            }
            Node::Element(mut inner) => {
                strip_markers_in(&mut inner);
                rewritten.push(Node::Element(inner));
            }
            text => rewritten.push(text),
        }
    }
    element.children = rewritten;
}

/// Merge adjacent text node siblings, recursively.
fn normalize(element: &mut Element) {
    let mut merged: Vec<Node> = Vec::with_capacity(element.children.len());
    for child in element.children.drain(..) {
        match (merged.last_mut(), child) {
            (Some(Node::Text(previous)), Node::Text(text)) => previous.push_str(&text),
            (_, Node::Element(mut inner)) => {
                normalize(&mut inner);
                merged.push(Node::Element(inner));
            }
            (_, text) => merged.push(text),
        }
    }
    element.children = merged;
}

fn collect_markers<'a>(element: &'a Element, out: &mut Vec<&'a Marker>) {
    for child in &element.children {
        if let Node::Element(inner) = child {
            if let Some(marker) = &inner.marker {
                out.push(marker);
            }
            collect_markers(inner, out);
        }
    }
}
