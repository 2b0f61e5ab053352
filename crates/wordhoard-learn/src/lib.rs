//! Spaced-repetition review: per-word mastery tracking and drill
//! session assembly over the vocabulary.

pub mod progress;
pub mod session;

pub use progress::{INTERVAL_DAYS, ProgressStore, WordProgress};
pub use session::{DrillSession, LearningMode, QueueFilter, SessionStats, build_queue};
