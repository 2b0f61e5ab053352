use std::collections::HashMap;

use wordhoard_types::{EntryKind, VocabEntry};

use crate::progress::WordProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningMode {
    /// Show the word, reveal the translation, self-grade.
    Flashcard,
    /// Pick the translation out of four options.
    Quiz,
    /// Type the word given its translation.
    Spelling,
}

impl std::str::FromStr for LearningMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flashcard" | "cards" => Ok(Self::Flashcard),
            "quiz" => Ok(Self::Quiz),
            "spelling" => Ok(Self::Spelling),
            other => Err(format!("unknown learning mode: {other}")),
        }
    }
}

/// Which entries a drill draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueFilter {
    All,
    Word,
    Phrase,
    Starred,
    /// Mastery below 3: the words still being fought with.
    Difficult,
}

const DIFFICULT_BELOW: u8 = 3;

fn mastery_of(progress: &HashMap<String, WordProgress>, key: &str) -> u8 {
    progress.get(key).map(|p| p.mastery_level).unwrap_or(0)
}

/// Assemble a review queue: filter, then weakest-first (mastery
/// ascending, least recently reviewed breaking ties, never-reviewed
/// first), capped at the daily goal.
pub fn build_queue(
    entries: &[VocabEntry],
    progress: &HashMap<String, WordProgress>,
    filter: QueueFilter,
    daily_goal: usize,
) -> Vec<VocabEntry> {
    let mut queue: Vec<VocabEntry> = entries
        .iter()
        .filter(|e| match filter {
            QueueFilter::All => true,
            QueueFilter::Word => e.kind == EntryKind::Word,
            QueueFilter::Phrase => e.kind == EntryKind::Phrase,
            QueueFilter::Starred => e.starred,
            QueueFilter::Difficult => mastery_of(progress, &e.key) < DIFFICULT_BELOW,
        })
        .cloned()
        .collect();

    queue.sort_by(|a, b| {
        let key = |e: &VocabEntry| {
            (
                mastery_of(progress, &e.key),
                progress
                    .get(&e.key)
                    .and_then(|p| p.last_reviewed)
                    .map(|t| t.unix_timestamp())
                    .unwrap_or(i64::MIN),
            )
        };
        key(a).cmp(&key(b)).then_with(|| a.key.cmp(&b.key))
    });

    queue.truncate(daily_goal);
    queue
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub reviewed: usize,
    pub correct: usize,
}

impl SessionStats {
    pub fn accuracy(&self) -> f64 {
        if self.reviewed == 0 {
            0.0
        } else {
            self.correct as f64 / self.reviewed as f64
        }
    }
}

/// One walk through a review queue. The session only tracks position
/// and outcomes; persisting results is the caller's concern.
pub struct DrillSession {
    mode: LearningMode,
    queue: Vec<VocabEntry>,
    position: usize,
    stats: SessionStats,
    mistakes: Vec<String>,
}

impl DrillSession {
    pub fn new(mode: LearningMode, queue: Vec<VocabEntry>) -> Self {
        Self {
            mode,
            queue,
            position: 0,
            stats: SessionStats::default(),
            mistakes: Vec::new(),
        }
    }

    pub fn mode(&self) -> LearningMode {
        self.mode
    }

    pub fn current(&self) -> Option<&VocabEntry> {
        self.queue.get(self.position)
    }

    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.position)
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Four translation options for the current word: the correct one
    /// plus up to three distractors from the pool, placed
    /// deterministically so a session can be replayed in tests.
    pub fn quiz_options(&self, pool: &[VocabEntry]) -> Vec<String> {
        let Some(current) = self.current() else {
            return Vec::new();
        };

        let mut distractors: Vec<&VocabEntry> = pool
            .iter()
            .filter(|e| e.key != current.key && e.translation != current.translation)
            .collect();
        distractors.sort_by(|a, b| a.key.cmp(&b.key));

        let mut options: Vec<String> = distractors
            .iter()
            .take(3)
            .map(|e| e.translation.clone())
            .collect();
        let slot = current.key.len() % (options.len() + 1);
        options.insert(slot, current.translation.clone());
        options
    }

    /// Grade a typed answer against the current word, ignoring case and
    /// surrounding whitespace.
    pub fn check_spelling(&self, answer: &str) -> bool {
        self.current()
            .map(|e| answer.trim().eq_ignore_ascii_case(&e.key))
            .unwrap_or(false)
    }

    /// Record the outcome for the current word and advance. Returns the
    /// reviewed entry's key, or None when the queue is exhausted.
    pub fn answer(&mut self, correct: bool) -> Option<String> {
        let key = self.current()?.key.clone();
        self.stats.reviewed += 1;
        if correct {
            self.stats.correct += 1;
        } else {
            self.mistakes.push(key.clone());
        }
        self.position += 1;
        Some(key)
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.queue.len()
    }

    /// A fresh session over this session's mistakes, same mode.
    pub fn mistake_review(&self) -> Option<DrillSession> {
        if self.mistakes.is_empty() {
            return None;
        }
        let queue: Vec<VocabEntry> = self
            .queue
            .iter()
            .filter(|e| self.mistakes.contains(&e.key))
            .cloned()
            .collect();
        Some(DrillSession::new(self.mode, queue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, translation: &str) -> VocabEntry {
        VocabEntry::new(key, translation.to_string(), None)
    }

    fn progress_at(level: u8, reviewed: bool) -> WordProgress {
        let mut p = WordProgress::default();
        if reviewed {
            for _ in 0..level {
                p.record_result(true);
            }
        } else {
            p.mastery_level = level;
        }
        p
    }

    #[test]
    fn queue_is_weakest_first_and_capped() {
        let entries = vec![entry("easy", "易"), entry("hard", "难"), entry("new", "新")];
        let mut progress = HashMap::new();
        progress.insert("easy".to_string(), progress_at(4, true));
        progress.insert("hard".to_string(), progress_at(1, true));

        let queue = build_queue(&entries, &progress, QueueFilter::All, 2);
        let keys: Vec<&str> = queue.iter().map(|e| e.key.as_str()).collect();
        // "new" has no progress (level 0, never reviewed) and leads.
        assert_eq!(keys, vec!["new", "hard"]);
    }

    #[test]
    fn difficult_filter_excludes_mastered_words() {
        let entries = vec![entry("easy", "易"), entry("hard", "难")];
        let mut progress = HashMap::new();
        progress.insert("easy".to_string(), progress_at(3, false));
        progress.insert("hard".to_string(), progress_at(2, false));

        let queue = build_queue(&entries, &progress, QueueFilter::Difficult, 20);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].key, "hard");
    }

    #[test]
    fn starred_filter_selects_only_starred() {
        let mut starred = entry("cat", "猫");
        starred.starred = true;
        let entries = vec![entry("dog", "狗"), starred];

        let queue = build_queue(&entries, &HashMap::new(), QueueFilter::Starred, 20);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].key, "cat");
    }

    #[test]
    fn quiz_options_contain_the_answer_once() {
        let pool = vec![
            entry("cat", "猫"),
            entry("dog", "狗"),
            entry("bird", "鸟"),
            entry("fish", "鱼"),
            entry("horse", "马"),
        ];
        let session = DrillSession::new(LearningMode::Quiz, vec![pool[0].clone()]);

        let options = session.quiz_options(&pool);
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|o| *o == "猫").count(), 1);
        // Deterministic across runs.
        assert_eq!(options, session.quiz_options(&pool));
    }

    #[test]
    fn quiz_options_degrade_with_a_tiny_pool() {
        let pool = vec![entry("cat", "猫")];
        let session = DrillSession::new(LearningMode::Quiz, vec![pool[0].clone()]);
        assert_eq!(session.quiz_options(&pool), vec!["猫".to_string()]);
    }

    #[test]
    fn spelling_check_is_case_insensitive() {
        let session = DrillSession::new(LearningMode::Spelling, vec![entry("Hello", "你好")]);
        assert!(session.check_spelling("  HELLO "));
        assert!(!session.check_spelling("helo"));
    }

    #[test]
    fn session_tracks_stats_and_mistakes() {
        let queue = vec![entry("cat", "猫"), entry("dog", "狗"), entry("bird", "鸟")];
        let mut session = DrillSession::new(LearningMode::Flashcard, queue);

        assert_eq!(session.answer(true).as_deref(), Some("cat"));
        assert_eq!(session.answer(false).as_deref(), Some("dog"));
        assert_eq!(session.answer(true).as_deref(), Some("bird"));
        assert!(session.is_finished());
        assert!(session.answer(true).is_none());

        let stats = session.stats();
        assert_eq!(stats.reviewed, 3);
        assert_eq!(stats.correct, 2);
        assert!((stats.accuracy() - 2.0 / 3.0).abs() < 1e-9);

        let review = session.mistake_review().unwrap();
        assert_eq!(review.remaining(), 1);
        assert_eq!(review.current().unwrap().key, "dog");
    }

    #[test]
    fn perfect_session_has_no_mistake_review() {
        let mut session = DrillSession::new(LearningMode::Flashcard, vec![entry("cat", "猫")]);
        session.answer(true);
        assert!(session.mistake_review().is_none());
    }
}
