use std::collections::HashMap;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use wordhoard_types::{EntryKind, PartOfSpeech, VocabEntry, normalize_key};

use crate::export::ExportEnvelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Keep existing entries; an imported duplicate wins only when it
    /// carries a higher usage count.
    Merge,
    /// Drop the current vocabulary and take the imported set wholesale.
    Replace,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub added: usize,
    pub updated: usize,
    pub total: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file contains no vocabulary entries")]
    Empty,

    #[error("invalid entry {key:?}: {reason}")]
    Record { key: String, reason: String },

    #[error("invalid CSV row {line}: {reason}")]
    Row { line: usize, reason: String },

    #[error("wrong backup type {0:?}")]
    WrongKind(String),
}

/// Parse a JSON backup: either a full export envelope or a bare
/// word-to-entry map. The whole file is validated before anything is
/// handed back, so a bad record never partially applies.
pub fn parse_json(input: &str) -> Result<HashMap<String, VocabEntry>, ImportError> {
    let data: HashMap<String, VocabEntry> = match serde_json::from_str::<ExportEnvelope>(input) {
        Ok(envelope) => envelope.data.into_iter().collect(),
        Err(_) => serde_json::from_str(input)?,
    };

    let mut vocab = HashMap::with_capacity(data.len());
    for (map_key, mut entry) in data {
        // Older backups stored the key only as the map key.
        if entry.key.is_empty() {
            entry.key = normalize_key(&map_key);
        }
        if entry.source_text.is_empty() {
            entry.source_text = entry.key.clone();
        }
        validate(&entry)?;
        vocab.insert(entry.key.clone(), entry);
    }

    if vocab.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(vocab)
}

/// Parse a CSV backup as `export_csv` writes it: BOM optional, header
/// row required, quoted fields with doubled quotes, row order
/// word/translation/type/part-of-speech/count/first-used/last-used/
/// starred.
pub fn parse_csv(input: &str) -> Result<HashMap<String, VocabEntry>, ImportError> {
    let input = input.trim_start_matches('\u{feff}');
    let mut records = csv_records(input).into_iter().enumerate();

    let Some((_, header)) = records.next() else {
        return Err(ImportError::Empty);
    };
    if header.len() < 8 {
        return Err(ImportError::Row {
            line: 1,
            reason: format!("expected 8 columns in header, found {}", header.len()),
        });
    }

    let mut vocab = HashMap::new();
    for (index, fields) in records {
        let line = index + 1;
        if fields.len() == 1 && fields[0].trim().is_empty() {
            continue;
        }
        if fields.len() < 8 {
            return Err(ImportError::Row {
                line,
                reason: format!("expected 8 columns, found {}", fields.len()),
            });
        }

        let entry = row_to_entry(&fields).map_err(|reason| ImportError::Row { line, reason })?;
        validate(&entry)?;
        vocab.insert(entry.key.clone(), entry);
    }

    if vocab.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(vocab)
}

/// Fold a validated import into the live vocabulary.
pub fn apply_import(
    vocab: &mut HashMap<String, VocabEntry>,
    imported: HashMap<String, VocabEntry>,
    mode: ImportMode,
) -> ImportStats {
    let mut stats = ImportStats::default();

    if mode == ImportMode::Replace {
        vocab.clear();
    }

    for (key, entry) in imported {
        match vocab.get(&key) {
            None => {
                vocab.insert(key, entry);
                stats.added += 1;
            }
            Some(existing) if entry.count > existing.count => {
                vocab.insert(key, entry);
                stats.updated += 1;
            }
            Some(_) => {}
        }
    }

    stats.total = vocab.len();
    tracing::info!(
        added = stats.added,
        updated = stats.updated,
        total = stats.total,
        "import applied"
    );
    stats
}

fn validate(entry: &VocabEntry) -> Result<(), ImportError> {
    let invalid = |reason: &str| ImportError::Record {
        key: entry.key.clone(),
        reason: reason.to_string(),
    };

    if entry.key.trim().is_empty() {
        return Err(invalid("empty word"));
    }
    if entry.translation.trim().is_empty() {
        return Err(invalid("empty translation"));
    }
    if entry.count == 0 {
        return Err(invalid("usage count must be at least 1"));
    }
    Ok(())
}

fn row_to_entry(fields: &[String]) -> Result<VocabEntry, String> {
    let word = fields[0].trim();
    let kind = match fields[2].trim() {
        "word" => EntryKind::Word,
        "phrase" => EntryKind::Phrase,
        "sentence" => EntryKind::Sentence,
        other => return Err(format!("unknown type {other:?}")),
    };
    let count: u32 = fields[4]
        .trim()
        .parse()
        .map_err(|_| format!("unparseable count {:?}", fields[4]))?;

    Ok(VocabEntry {
        key: normalize_key(word),
        source_text: word.to_string(),
        translation: fields[1].trim().to_string(),
        kind,
        part_of_speech: PartOfSpeech::parse(&fields[3]),
        count,
        starred: fields[7].trim() == "是",
        first_used: parse_timestamp(&fields[5])?,
        last_used: parse_timestamp(&fields[6])?,
    })
}

fn parse_timestamp(field: &str) -> Result<OffsetDateTime, String> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(OffsetDateTime::now_utc());
    }
    OffsetDateTime::parse(field, &Rfc3339).map_err(|_| format!("unparseable timestamp {field:?}"))
}

/// Minimal CSV reader for our own export shape: quoted fields may
/// contain commas, newlines and doubled quotes.
fn csv_records(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                other => field.push(other),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut fields));
            }
            other => field.push(other),
        }
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(fields);
    }
    records
}
