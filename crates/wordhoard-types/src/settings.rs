use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// User-tunable settings persisted as one object under the settings
/// storage key. Theme values are carried as opaque strings; nothing in
/// this codebase renders them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Preferred translation provider: "signed" or "fallback".
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Words per drill session; 0 falls back to the configured default.
    #[serde(default)]
    pub daily_goal: usize,
    #[serde(default = "default_export_format")]
    pub default_export_format: String,
    #[serde(default)]
    pub highlight_style: HashMap<String, String>,
}

fn default_provider() -> String {
    "signed".to_string()
}

fn default_export_format() -> String {
    "json".to_string()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            daily_goal: 0,
            default_export_format: default_export_format(),
            highlight_style: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: UserSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, UserSettings::default());

        let settings: UserSettings =
            serde_json::from_str(r#"{"provider":"fallback","dailyGoal":30}"#).unwrap();
        assert_eq!(settings.provider, "fallback");
        assert_eq!(settings.daily_goal, 30);
        assert_eq!(settings.default_export_format, "json");
    }
}
