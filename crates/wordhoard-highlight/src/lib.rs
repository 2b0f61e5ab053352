pub mod dom;
pub mod engine;
pub mod plan;
pub mod selection;

pub use dom::{Document, Element, Marker, Node};
pub use engine::HighlightEngine;
pub use plan::{Segment, compile_pattern, plan_segments};
pub use selection::{CaptureOutcome, SelectionCapture, SelectionSnapshot, SelectionState};
