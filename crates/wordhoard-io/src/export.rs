use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use wordhoard_types::{CategoryFilter, VocabEntry};

/// JSON backup wrapper. `data` is a sorted map so repeated exports of
/// the same vocabulary are byte-identical.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub export_date: OffsetDateTime,
    pub content_type: CategoryFilter,
    pub word_count: usize,
    pub data: BTreeMap<String, VocabEntry>,
}

const EXPORT_VERSION: &str = "1.0";

/// Column order matches what the import side expects back.
const CSV_HEADER: &str = "单词,翻译,类型,词性,使用次数,首次使用,最近使用,星标";

fn filtered(
    vocab: &HashMap<String, VocabEntry>,
    filter: CategoryFilter,
) -> BTreeMap<String, VocabEntry> {
    vocab
        .iter()
        .filter(|(_, entry)| match filter {
            CategoryFilter::All => true,
            CategoryFilter::Starred => entry.starred,
            other => other.kind() == Some(entry.kind),
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Serialize the selected slice of the vocabulary as a pretty JSON
/// envelope.
pub fn export_json(
    vocab: &HashMap<String, VocabEntry>,
    filter: CategoryFilter,
) -> Result<String, serde_json::Error> {
    let data = filtered(vocab, filter);
    let envelope = ExportEnvelope {
        version: EXPORT_VERSION.to_string(),
        export_date: OffsetDateTime::now_utc(),
        content_type: filter,
        word_count: data.len(),
        data,
    };
    serde_json::to_string_pretty(&envelope)
}

/// CSV export with a UTF-8 BOM so spreadsheet tools detect the encoding
/// of the Chinese columns.
pub fn export_csv(vocab: &HashMap<String, VocabEntry>, filter: CategoryFilter) -> String {
    let mut out = String::from("\u{feff}");
    out.push_str(CSV_HEADER);
    out.push('\n');

    for entry in filtered(vocab, filter).values() {
        let row = [
            csv_field(&entry.key),
            csv_field(&entry.translation),
            csv_field(entry.kind.as_str()),
            csv_field(entry.part_of_speech.map(|p| p.as_str()).unwrap_or("")),
            entry.count.to_string(),
            csv_field(&rfc3339(entry.first_used)),
            csv_field(&rfc3339(entry.last_used)),
            if entry.starred { "是" } else { "否" }.to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

fn rfc3339(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_default()
}

/// Quote a field when it contains a comma, quote or newline; embedded
/// quotes are doubled.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordhoard_types::PartOfSpeech;

    fn vocab() -> HashMap<String, VocabEntry> {
        let mut map = HashMap::new();
        let mut cat = VocabEntry::new("cat", "猫".into(), Some(PartOfSpeech::Noun));
        cat.count = 5;
        cat.starred = true;
        map.insert(cat.key.clone(), cat);

        let phrase = VocabEntry::new("give up", "放弃".into(), None);
        map.insert(phrase.key.clone(), phrase);
        map
    }

    #[test]
    fn json_envelope_carries_metadata_and_filtered_data() {
        let json = export_json(&vocab(), CategoryFilter::Word).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], "1.0");
        assert_eq!(value["contentType"], "word");
        assert_eq!(value["wordCount"], 1);
        assert_eq!(value["data"]["cat"]["translation"], "猫");
        assert!(value["data"].get("give up").is_none());
    }

    #[test]
    fn csv_starts_with_bom_and_header() {
        let csv = export_csv(&vocab(), CategoryFilter::All);
        assert!(csv.starts_with('\u{feff}'));

        let mut lines = csv.trim_start_matches('\u{feff}').lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        // BTreeMap order: "cat" before "give up".
        let cat = lines.next().unwrap();
        assert!(cat.starts_with("cat,猫,word,noun,5,"));
        assert!(cat.ends_with(",是"));
        let phrase = lines.next().unwrap();
        assert!(phrase.starts_with("give up,放弃,phrase,,1,"));
        assert!(phrase.ends_with(",否"));
    }

    #[test]
    fn csv_fields_with_commas_are_quoted() {
        let mut map = HashMap::new();
        let entry = VocabEntry::new("hello", "你好，\"世界\", ok".into(), None);
        map.insert(entry.key.clone(), entry);

        let csv = export_csv(&map, CategoryFilter::All);
        assert!(csv.contains("hello,\"你好，\"\"世界\"\", ok\",word"));
    }

    #[test]
    fn starred_filter_cuts_across_kinds() {
        let csv = export_csv(&vocab(), CategoryFilter::Starred);
        assert!(csv.contains("cat"));
        assert!(!csv.contains("give up"));
    }
}
