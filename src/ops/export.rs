//! Export a user's entries in the entry-table row format.

use crate::constants;
use crate::errors::{AppError, AppResult};
use crate::store::entries::JournalEntry;
use tracing::debug;

/// Serializes entries as CSV with the same header and columns as the entry table.
///
/// The header is written even when there are no entries, so an empty export is
/// still a valid table.
pub fn export_entries(entries: &[JournalEntry]) -> AppResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(constants::ENTRIES_HEADER)?;
    for entry in entries {
        writer.serialize(entry)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))?;
    let csv = String::from_utf8(bytes)
        .map_err(|e| AppError::Validation(format!("Export is not valid UTF-8: {}", e)))?;

    debug!("Exported {} entries", entries.len());
    Ok(csv)
}

/// Default file name for a user's export, e.g. `ana_journal.csv`.
pub fn export_file_name(username: &str) -> String {
    format!("{}{}", username, constants::EXPORT_FILE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal_core::{EntryId, Mood};
    use crate::store::entries::{EntryStore, NewEntry};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("ana"), "ana_journal.csv");
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let csv = export_entries(&[]).unwrap();
        assert_eq!(
            csv,
            "id,username,date,mood,gratitude,affirmation,image_name\n"
        );
    }

    #[test]
    fn test_export_matches_table_format() {
        let temp_dir = tempdir().unwrap();
        let table = temp_dir.path().join("journal_entries.csv");
        let store = EntryStore::new(&table);
        store
            .append(NewEntry {
                username: "ana".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                mood: Mood::Happy,
                gratitude: "sunlight, and tea".to_string(),
                affirmation: "I am enough".to_string(),
                image_name: Some("cat.png".to_string()),
            })
            .unwrap();

        let entries = store.list_by_user("ana").unwrap();
        let csv = export_entries(&entries).unwrap();

        // A single-user table exports byte for byte
        assert_eq!(csv, fs::read_to_string(&table).unwrap());
    }

    #[test]
    fn test_export_parses_back() {
        let entry = JournalEntry {
            id: EntryId::new(),
            username: "ana".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            mood: Mood::Sad,
            gratitude: "a \"quiet\" evening\nwith rain".to_string(),
            affirmation: "This will pass".to_string(),
            image_name: None,
        };

        let csv = export_entries(std::slice::from_ref(&entry)).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let parsed: Vec<JournalEntry> = reader.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(parsed, vec![entry]);
    }
}
