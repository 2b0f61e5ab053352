use serde::{Deserialize, Serialize};

use self::highlight::HighlightConfig;
use self::learning::LearningConfig;
use self::translator::TranslatorConfig;
use self::ui::UiConfig;

pub mod highlight;
pub mod learning;
pub mod translator;
pub mod ui;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub highlight: HighlightConfig,
    pub learning: LearningConfig,
    pub ui: UiConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            translator: TranslatorConfig::new(),
            highlight: HighlightConfig::new(),
            learning: LearningConfig::new(),
            ui: UiConfig::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
