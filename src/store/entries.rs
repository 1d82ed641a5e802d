//! Entry Store.
//!
//! This module provides functions for creating, reading, updating, and deleting
//! journal entries in the `journal_entries.csv` table. Entries are addressed by
//! their durable `EntryId`, never by row position.

use super::TableFile;
use crate::constants;
use crate::errors::{AppResult, StoreError};
use crate::journal_core::{require_non_blank, EntryId, Mood};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Represents a journal entry as stored in the entry table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    pub username: String,
    pub date: NaiveDate,
    pub mood: Mood,
    pub gratitude: String,
    pub affirmation: String,
    pub image_name: Option<String>,
}

/// The caller-supplied fields of an entry about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub username: String,
    pub date: NaiveDate,
    pub mood: Mood,
    pub gratitude: String,
    pub affirmation: String,
    pub image_name: Option<String>,
}

/// Fields that may change after an entry was written. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    pub gratitude: Option<String>,
    pub affirmation: Option<String>,
}

impl EntryUpdate {
    /// Returns `true` if the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.gratitude.is_none() && self.affirmation.is_none()
    }

    fn validate(&self) -> AppResult<()> {
        if let Some(gratitude) = &self.gratitude {
            require_non_blank("Gratitude", gratitude)?;
        }
        if let Some(affirmation) = &self.affirmation {
            require_non_blank("Affirmation", affirmation)?;
        }
        Ok(())
    }

    fn apply(self, entry: &mut JournalEntry) {
        if let Some(gratitude) = self.gratitude {
            entry.gratitude = gratitude;
        }
        if let Some(affirmation) = self.affirmation {
            entry.affirmation = affirmation;
        }
    }
}

/// CSV-backed store of journal entries.
pub struct EntryStore {
    table: TableFile<JournalEntry>,
}

impl EntryStore {
    /// Opens the entry table at `path`. The file is created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EntryStore {
            table: TableFile::new(path, constants::ENTRIES_HEADER),
        }
    }

    /// Appends a new entry and returns it with its assigned id.
    ///
    /// Multiple entries per user per day are allowed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` (and persists nothing) if the username,
    /// gratitude or affirmation is blank.
    pub fn append(&self, new_entry: NewEntry) -> AppResult<JournalEntry> {
        require_non_blank("Username", &new_entry.username)?;
        require_non_blank("Gratitude", &new_entry.gratitude)?;
        require_non_blank("Affirmation", &new_entry.affirmation)?;

        let entry = JournalEntry {
            id: EntryId::new(),
            username: new_entry.username,
            date: new_entry.date,
            mood: new_entry.mood,
            gratitude: new_entry.gratitude,
            affirmation: new_entry.affirmation,
            image_name: new_entry.image_name,
        };

        self.table.transaction(|entries| {
            entries.push(entry.clone());
            Ok(())
        })?;

        info!("Saved entry {} for {}", entry.id, entry.date);
        Ok(entry)
    }

    /// Returns all entries of `username` in insertion order.
    pub fn list_by_user(&self, username: &str) -> AppResult<Vec<JournalEntry>> {
        let entries: Vec<JournalEntry> = self
            .table
            .load()?
            .into_iter()
            .filter(|entry| entry.username == username)
            .collect();

        debug!("Loaded {} entries for user", entries.len());
        Ok(entries)
    }

    /// Number of entries across all users.
    pub fn count(&self) -> AppResult<usize> {
        Ok(self.table.load()?.len())
    }

    /// Looks up a single entry by id.
    pub fn get(&self, id: EntryId) -> AppResult<Option<JournalEntry>> {
        Ok(self.table.load()?.into_iter().find(|entry| entry.id == id))
    }

    /// Changes the gratitude and/or affirmation of an entry.
    ///
    /// Date, mood, username and image are never touched.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` if a supplied field is blank
    /// - `StoreError::NotFound` if no entry has this id
    pub fn update(&self, id: EntryId, update: EntryUpdate) -> AppResult<JournalEntry> {
        self.update_matching(id, None, update)
    }

    /// Like `update`, but entries owned by another user are reported as `NotFound`.
    pub fn update_for_user(
        &self,
        username: &str,
        id: EntryId,
        update: EntryUpdate,
    ) -> AppResult<JournalEntry> {
        self.update_matching(id, Some(username), update)
    }

    /// Removes an entry and returns it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no entry has this id; the table is left
    /// unchanged.
    pub fn delete(&self, id: EntryId) -> AppResult<JournalEntry> {
        self.delete_matching(id, None)
    }

    /// Like `delete`, but entries owned by another user are reported as `NotFound`.
    pub fn delete_for_user(&self, username: &str, id: EntryId) -> AppResult<JournalEntry> {
        self.delete_matching(id, Some(username))
    }

    fn update_matching(
        &self,
        id: EntryId,
        owner: Option<&str>,
        update: EntryUpdate,
    ) -> AppResult<JournalEntry> {
        update.validate()?;

        let updated = self.table.transaction(|entries| {
            let entry = entries
                .iter_mut()
                .find(|entry| entry.id == id && owned_by(entry, owner))
                .ok_or(StoreError::NotFound(id))?;
            update.apply(entry);
            Ok(entry.clone())
        })?;

        info!("Updated entry {}", id);
        Ok(updated)
    }

    fn delete_matching(&self, id: EntryId, owner: Option<&str>) -> AppResult<JournalEntry> {
        let removed = self.table.transaction(|entries| {
            let index = entries
                .iter()
                .position(|entry| entry.id == id && owned_by(entry, owner))
                .ok_or(StoreError::NotFound(id))?;
            Ok(entries.remove(index))
        })?;

        info!("Deleted entry {}", id);
        Ok(removed)
    }
}

fn owned_by(entry: &JournalEntry, owner: Option<&str>) -> bool {
    owner.map_or(true, |username| entry.username == username)
}

/// Keeps the entries written on `date`. No match yields an empty list.
pub fn filter_by_date(entries: &[JournalEntry], date: NaiveDate) -> Vec<JournalEntry> {
    entries
        .iter()
        .filter(|entry| entry.date == date)
        .cloned()
        .collect()
}
