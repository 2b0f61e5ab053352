use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use wordhoard_types::UserSettings;

use crate::import::ImportError;

/// Backup wrapper for the settings object, tagged so a vocabulary
/// backup cannot be fed into the settings import by mistake.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsEnvelope {
    pub version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub export_date: OffsetDateTime,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: UserSettings,
}

pub const SETTINGS_KIND: &str = "settings";

pub fn export_settings(settings: &UserSettings) -> Result<String, serde_json::Error> {
    let envelope = SettingsEnvelope {
        version: "1.0".to_string(),
        export_date: OffsetDateTime::now_utc(),
        kind: SETTINGS_KIND.to_string(),
        data: settings.clone(),
    };
    serde_json::to_string_pretty(&envelope)
}

pub fn parse_settings(input: &str) -> Result<UserSettings, ImportError> {
    let envelope: SettingsEnvelope = serde_json::from_str(input)?;
    if envelope.kind != SETTINGS_KIND {
        return Err(ImportError::WrongKind(envelope.kind));
    }

    let settings = envelope.data;
    if settings.provider.trim().is_empty() {
        return Err(ImportError::Record {
            key: "provider".to_string(),
            reason: "empty provider".to_string(),
        });
    }
    if !matches!(settings.default_export_format.as_str(), "json" | "csv") {
        return Err(ImportError::Record {
            key: "defaultExportFormat".to_string(),
            reason: format!("unknown format {:?}", settings.default_export_format),
        });
    }
    Ok(settings)
}
