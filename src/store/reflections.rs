//! Weekly reflections, stored as one text file per user and day.

use super::{ensure_directory_exists, write_atomic};
use crate::constants;
use crate::errors::AppResult;
use crate::journal_core::{require_non_blank, validate_name_component};
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

/// Directory of `{username}_{date}.txt` reflection files.
#[derive(Debug, Clone)]
pub struct ReflectionStore {
    dir: PathBuf,
}

impl ReflectionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ReflectionStore { dir: dir.into() }
    }

    /// Path of the reflection for `username` on `date`, whether or not it exists.
    pub fn path_for(&self, username: &str, date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.{}",
            username,
            date.format(constants::DATE_FORMAT_ISO),
            constants::REFLECTION_FILE_EXTENSION
        ))
    }

    /// Saves the reflection for `username` on `date`, replacing an earlier one
    /// from the same day.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the text is blank or the username is
    /// not a valid file name component.
    pub fn save(&self, username: &str, date: NaiveDate, text: &str) -> AppResult<PathBuf> {
        validate_name_component("Username", username)?;
        require_non_blank("Reflection", text)?;

        ensure_directory_exists(&self.dir)?;
        let path = self.path_for(username, date);
        write_atomic(&path, text.as_bytes())?;

        info!("Saved reflection for {}", date);
        Ok(path)
    }

    /// Reads the reflection for `username` on `date`, if one was saved.
    pub fn read(&self, username: &str, date: NaiveDate) -> AppResult<Option<String>> {
        validate_name_component("Username", username)?;

        match fs::read_to_string(self.path_for(username, date)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Dates on which `username` saved a reflection, oldest first.
    pub fn list_dates(&self, username: &str) -> AppResult<Vec<NaiveDate>> {
        validate_name_component("Username", username)?;

        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let prefix = format!("{}_", username);
        let suffix = format!(".{}", constants::REFLECTION_FILE_EXTENSION);

        let mut dates = Vec::new();
        for dir_entry in read_dir {
            let file_name = dir_entry?.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };

            let date = file_name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(&suffix))
                .and_then(|date| NaiveDate::parse_from_str(date, constants::DATE_FORMAT_ISO).ok());

            if let Some(date) = date {
                dates.push(date);
            }
        }

        dates.sort_unstable();
        debug!("Found {} reflections", dates.len());
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use tempfile::tempdir;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_save_and_read() {
        let temp_dir = tempdir().unwrap();
        let store = ReflectionStore::new(temp_dir.path().join("weekly_notes"));

        let path = store.save("ana", date(7), "A calm week.").unwrap();

        assert_eq!(path, temp_dir.path().join("weekly_notes").join("ana_2024-01-07.txt"));
        assert_eq!(
            store.read("ana", date(7)).unwrap().as_deref(),
            Some("A calm week.")
        );
        assert_eq!(store.read("ana", date(8)).unwrap(), None);
        assert_eq!(store.read("bob", date(7)).unwrap(), None);
    }

    #[test]
    fn test_same_day_overwrites() {
        let temp_dir = tempdir().unwrap();
        let store = ReflectionStore::new(temp_dir.path().join("weekly_notes"));

        store.save("ana", date(7), "first draft").unwrap();
        store.save("ana", date(7), "second draft").unwrap();

        assert_eq!(
            store.read("ana", date(7)).unwrap().as_deref(),
            Some("second draft")
        );
        assert_eq!(store.list_dates("ana").unwrap(), vec![date(7)]);
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let store = ReflectionStore::new(temp_dir.path().join("weekly_notes"));

        assert!(matches!(
            store.save("ana", date(7), "  \n"),
            Err(AppError::Validation(_))
        ));
        assert!(!temp_dir.path().join("weekly_notes").exists());
    }

    #[test]
    fn test_list_dates_is_sorted_and_per_user() {
        let temp_dir = tempdir().unwrap();
        let store = ReflectionStore::new(temp_dir.path().join("weekly_notes"));

        assert!(store.list_dates("ana").unwrap().is_empty());

        store.save("ana", date(14), "two").unwrap();
        store.save("ana", date(7), "one").unwrap();
        store.save("ana_b", date(9), "someone else").unwrap();
        fs::write(store.dir.join("ana_notes.txt"), "stray").unwrap();

        assert_eq!(store.list_dates("ana").unwrap(), vec![date(7), date(14)]);
        assert_eq!(store.list_dates("ana_b").unwrap(), vec![date(9)]);
    }

    #[test]
    fn test_username_cannot_escape_directory() {
        let temp_dir = tempdir().unwrap();
        let store = ReflectionStore::new(temp_dir.path().join("weekly_notes"));

        assert!(matches!(
            store.save("../ana", date(7), "text"),
            Err(AppError::Validation(_))
        ));
    }
}
