//! Core journal values without I/O operations.
//!
//! This module contains the pure domain vocabulary shared by the stores and
//! operations: the `Mood` labels, the durable `EntryId`, date parsing, input
//! validation helpers and the quote of the day.

use crate::constants;
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Daily quotes, picked by day of month.
const QUOTES: &[&str] = &[
    "Gratitude turns what we have into enough.",
    "Start each day with a grateful heart.",
    "Gratitude is the fairest blossom which springs from the soul.",
    "Acknowledging the good that you already have in your life is the foundation for all abundance.",
    "Happiness is not what makes us grateful. It is gratefulness that makes us happy.",
];

/// The fixed set of moods an entry can record.
///
/// Moods are stored and displayed with a decorative emoji prefix
/// (`😊 Happy`). The declaration order is the order used by aggregations.
///
/// # Examples
///
/// ```
/// use gratitude::journal_core::Mood;
///
/// let mood: Mood = "happy".parse().unwrap();
/// assert_eq!(mood, Mood::Happy);
/// assert_eq!(mood.to_string(), "😊 Happy");
///
/// // The decorated form parses back to the same mood
/// let stored: Mood = "😴 Tired".parse().unwrap();
/// assert_eq!(stored, Mood::Tired);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mood {
    Happy,
    Okay,
    Sad,
    Angry,
    Tired,
}

impl Mood {
    /// Every mood, in display order.
    pub const ALL: [Mood; 5] = [Mood::Happy, Mood::Okay, Mood::Sad, Mood::Angry, Mood::Tired];

    /// The plain label without decoration.
    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Okay => "Okay",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Tired => "Tired",
        }
    }

    /// The decorative prefix shown before the label.
    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Okay => "😐",
            Mood::Sad => "😔",
            Mood::Angry => "😠",
            Mood::Tired => "😴",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

impl FromStr for Mood {
    type Err = AppError;

    /// Accepts the plain label in any case, or the decorated stored form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Mood::ALL
            .into_iter()
            .find(|mood| {
                mood.label().eq_ignore_ascii_case(trimmed) || mood.to_string() == trimmed
            })
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Unknown mood '{}'. Expected one of: happy, okay, sad, angry, tired",
                    s
                ))
            })
    }
}

impl Serialize for Mood {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Durable identifier of a journal entry, assigned once at creation.
///
/// Unlike a row position, an id never comes to address a different entry
/// after other rows are added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        EntryId(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EntryId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(EntryId)
            .map_err(|e| AppError::Validation(format!("Invalid entry id '{}': {}", s, e)))
    }
}

/// Parses a date in YYYY-MM-DD or YYYYMMDD format.
///
/// # Examples
///
/// ```
/// use gratitude::journal_core::parse_date_string;
///
/// let iso = parse_date_string("2024-01-03").unwrap();
/// let compact = parse_date_string("20240103").unwrap();
/// assert_eq!(iso, compact);
/// assert!(parse_date_string("yesterday").is_err());
/// ```
pub fn parse_date_string(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, constants::DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(date_str, constants::DATE_FORMAT_COMPACT))
}

/// Returns the quote for the given day.
pub fn quote_of_the_day(date: NaiveDate) -> &'static str {
    QUOTES[date.day() as usize % QUOTES.len()]
}

/// Rejects blank text for a required field.
pub fn require_non_blank(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Checks that a name can be used as a single file name component.
///
/// Usernames end up in reflection file names and attachment names are used
/// as-is inside the uploads directory, so neither may contain path separators,
/// start with a dot, or contain control characters.
pub fn validate_name_component(field: &str, value: &str) -> AppResult<()> {
    require_non_blank(field, value)?;

    if value.starts_with('.') {
        return Err(AppError::Validation(format!(
            "{} cannot start with '.'",
            field
        )));
    }

    if let Some(ch) = value
        .chars()
        .find(|c| constants::FORBIDDEN_NAME_CHARS.contains(c) || c.is_control())
    {
        return Err(AppError::Validation(format!(
            "{} cannot contain the character {:?}",
            field, ch
        )));
    }

    Ok(())
}
