use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Upper bound on words queued for one drill session.
    pub daily_goal: usize,
}

impl LearningConfig {
    pub fn new() -> Self {
        let daily_goal = env::var("WORDHOARD_DAILY_GOAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        LearningConfig { daily_goal }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self::new()
    }
}
