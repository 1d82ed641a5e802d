//! Mood statistics over journal entries.
//!
//! This module provides the aggregations behind the dashboard:
//! - Mood distribution (how often each mood was recorded)
//! - Weekly mood trend (per calendar week, per mood)
//! - Journal summary (entry count and whether the user wrote today)
//!
//! All functions are pure: they read the given entries and touch no storage.

use crate::constants;
use crate::journal_core::Mood;
use crate::store::entries::JournalEntry;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// A Monday-to-Sunday calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Week {
    start: NaiveDate,
}

impl Week {
    /// The week containing `date`.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use gratitude::ops::stats::Week;
    ///
    /// let wednesday = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    /// let week = Week::containing(wednesday);
    /// assert_eq!(week.start(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    /// assert_eq!(week.to_string(), "2024-01-01/2024-01-07");
    /// ```
    ///
    /// A week cut off by the start of the calendar begins at `NaiveDate::MIN`.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = i64::from(date.weekday().num_days_from_monday());
        Week {
            start: date
                .checked_sub_signed(Duration::days(offset))
                .unwrap_or(NaiveDate::MIN),
        }
    }

    /// The Monday that starts the week.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The Sunday that ends the week, or `NaiveDate::MAX` for the last
    /// partial week of the calendar.
    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_signed(Duration::days(6))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.start.format(constants::DATE_FORMAT_ISO),
            self.end().format(constants::DATE_FORMAT_ISO)
        )
    }
}

impl Serialize for Week {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Number of entries with one mood in one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyMoodCount {
    pub week: Week,
    pub mood: Mood,
    pub count: usize,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JournalSummary {
    /// Total number of entries
    pub total_entries: usize,
    /// Whether at least one entry is dated `today`
    pub wrote_today: bool,
}

/// Counts entries per mood.
///
/// Moods that never occur are absent from the map, so an empty input yields an
/// empty map. The counts always sum to `entries.len()`.
pub fn mood_distribution(entries: &[JournalEntry]) -> BTreeMap<Mood, usize> {
    let mut distribution = BTreeMap::new();
    for entry in entries {
        *distribution.entry(entry.mood).or_insert(0) += 1;
    }

    debug!("Mood distribution over {} entries: {:?}", entries.len(), distribution);
    distribution
}

/// Counts entries per calendar week and mood.
///
/// Rows are ordered by week, then by mood in `Mood::ALL` order. Only
/// combinations that occur are returned.
pub fn weekly_trend(entries: &[JournalEntry]) -> Vec<WeeklyMoodCount> {
    let mut buckets: BTreeMap<(Week, Mood), usize> = BTreeMap::new();
    for entry in entries {
        *buckets
            .entry((Week::containing(entry.date), entry.mood))
            .or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|((week, mood), count)| WeeklyMoodCount { week, mood, count })
        .collect()
}

/// Summarizes `entries` as seen on `today`.
pub fn journal_summary(entries: &[JournalEntry], today: NaiveDate) -> JournalSummary {
    JournalSummary {
        total_entries: entries.len(),
        wrote_today: entries.iter().any(|entry| entry.date == today),
    }
}
