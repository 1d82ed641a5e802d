//! Journal use cases for a logged-in user.
//!
//! Each function combines the stores for one caller action: signing up, saving
//! or changing an entry, writing a weekly reflection, or building the
//! dashboard. Everything that touches a user's journal asks the `Session` for
//! the username first, so callers cannot act on another user's entries.

use crate::config::Config;
use crate::crypto::Session;
use crate::errors::{AppError, AppResult};
use crate::journal_core::{quote_of_the_day, require_non_blank, EntryId, Mood};
use crate::ops::export::export_entries;
use crate::ops::stats::{
    journal_summary, mood_distribution, weekly_trend, JournalSummary, WeeklyMoodCount,
};
use crate::store::attachments::AttachmentStore;
use crate::store::ensure_directory_exists;
use crate::store::entries::{filter_by_date, EntryStore, EntryUpdate, JournalEntry, NewEntry};
use crate::store::reflections::ReflectionStore;
use crate::store::users::CredentialStore;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// An image uploaded alongside an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    /// Name the uploader gave the file
    pub filename: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

/// The fields a user fills in when writing an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntryRequest {
    pub mood: Mood,
    pub gratitude: String,
    pub affirmation: String,
    pub image: Option<ImageUpload>,
}

/// Everything the dashboard shows for one user on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: JournalSummary,
    pub distribution: BTreeMap<Mood, usize>,
    pub trend: Vec<WeeklyMoodCount>,
    pub quote: &'static str,
}

/// Creates the data directory layout and empty tables.
///
/// Running it again on an existing installation changes nothing.
pub fn initialize_storage(config: &Config) -> AppResult<()> {
    ensure_directory_exists(&config.data_dir)?;
    CredentialStore::new(&config.users_file).count()?;
    EntryStore::new(&config.entries_file).count()?;
    ensure_directory_exists(&config.uploads_dir)?;
    ensure_directory_exists(&config.reflections_dir)?;

    info!("Storage initialized");
    Ok(())
}

/// Registers a new user after checking the password confirmation.
///
/// # Errors
///
/// - `AppError::Validation` if the confirmation differs, or a field is blank
/// - `AuthError::DuplicateUser` if the username is taken
pub fn sign_up(
    users: &CredentialStore,
    username: &str,
    password: &str,
    confirmation: &str,
) -> AppResult<()> {
    if password != confirmation {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }
    users.register(username, password)
}

/// Saves a new entry for the logged-in user, dated `today`.
///
/// The text fields are validated before the image is written, so a rejected
/// entry leaves no stray attachment behind.
///
/// # Errors
///
/// - `AuthError::NotLoggedIn` / `AuthError::SessionExpired`
/// - `AppError::Validation` for blank text or an unusable image name
pub fn save_entry(
    config: &Config,
    session: &mut Session,
    request: NewEntryRequest,
    today: NaiveDate,
) -> AppResult<JournalEntry> {
    let username = session.username()?.to_string();
    require_non_blank("Gratitude", &request.gratitude)?;
    require_non_blank("Affirmation", &request.affirmation)?;

    let image_name = match request.image {
        Some(image) => {
            let path =
                AttachmentStore::new(&config.uploads_dir).store(&image.filename, &image.bytes)?;
            path.file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
        }
        None => None,
    };

    EntryStore::new(&config.entries_file).append(NewEntry {
        username,
        date: today,
        mood: request.mood,
        gratitude: request.gratitude,
        affirmation: request.affirmation,
        image_name,
    })
}

/// Lists the logged-in user's entries in the order they were written,
/// optionally only those dated `date`.
pub fn list_entries(
    config: &Config,
    session: &mut Session,
    date: Option<NaiveDate>,
) -> AppResult<Vec<JournalEntry>> {
    let username = session.username()?;
    let entries = EntryStore::new(&config.entries_file).list_by_user(username)?;

    Ok(match date {
        Some(date) => filter_by_date(&entries, date),
        None => entries,
    })
}

/// Changes the gratitude and/or affirmation of one of the user's own entries.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if the id is unknown or belongs to someone
/// else.
pub fn edit_entry(
    config: &Config,
    session: &mut Session,
    id: EntryId,
    update: EntryUpdate,
) -> AppResult<JournalEntry> {
    if update.is_empty() {
        return Err(AppError::Validation(
            "Nothing to change: supply a new gratitude or affirmation".to_string(),
        ));
    }

    let username = session.username()?;
    EntryStore::new(&config.entries_file).update_for_user(username, id, update)
}

/// Deletes one of the user's own entries.
///
/// The attached image, if any, is kept: other entries may share its name.
pub fn delete_entry(
    config: &Config,
    session: &mut Session,
    id: EntryId,
) -> AppResult<JournalEntry> {
    let username = session.username()?;
    EntryStore::new(&config.entries_file).delete_for_user(username, id)
}

/// The user's full journal as CSV.
pub fn export_journal(config: &Config, session: &mut Session) -> AppResult<String> {
    let entries = list_entries(config, session, None)?;
    export_entries(&entries)
}

/// Saves the weekly reflection dated `today`.
pub fn save_reflection(
    config: &Config,
    session: &mut Session,
    today: NaiveDate,
    text: &str,
) -> AppResult<PathBuf> {
    let username = session.username()?;
    ReflectionStore::new(&config.reflections_dir).save(username, today, text)
}

/// Reads the reflection the user saved on `date`, if any.
pub fn read_reflection(
    config: &Config,
    session: &mut Session,
    date: NaiveDate,
) -> AppResult<Option<String>> {
    let username = session.username()?;
    ReflectionStore::new(&config.reflections_dir).read(username, date)
}

/// Dates on which the user saved a reflection, oldest first.
pub fn list_reflections(config: &Config, session: &mut Session) -> AppResult<Vec<NaiveDate>> {
    let username = session.username()?;
    ReflectionStore::new(&config.reflections_dir).list_dates(username)
}

/// Builds the dashboard for the logged-in user.
pub fn dashboard(config: &Config, session: &mut Session, today: NaiveDate) -> AppResult<Dashboard> {
    let entries = list_entries(config, session, None)?;
    debug!("Building dashboard from {} entries", entries.len());

    Ok(Dashboard {
        summary: journal_summary(&entries, today),
        distribution: mood_distribution(&entries),
        trend: weekly_trend(&entries),
        quote: quote_of_the_day(today),
    })
}
