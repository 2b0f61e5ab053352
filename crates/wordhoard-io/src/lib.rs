//! Vocabulary backup: JSON and CSV export, validated import with merge
//! or replace semantics.

pub mod export;
pub mod import;
pub mod settings;

pub use export::{ExportEnvelope, export_csv, export_json};
pub use import::{ImportError, ImportMode, ImportStats, apply_import, parse_csv, parse_json};
pub use settings::{SettingsEnvelope, export_settings, parse_settings};
