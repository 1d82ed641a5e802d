//! High-level operations for the gratitude journal.
//!
//! This module provides the user-facing use cases that orchestrate the stores
//! (signing up, saving and editing entries, reflections, export) and the pure
//! mood statistics behind the dashboard.

pub mod export;
pub mod journal;
pub mod stats;

// Re-export commonly used functions
pub use export::{export_entries, export_file_name};
pub use journal::{
    dashboard, delete_entry, edit_entry, export_journal, initialize_storage, list_entries,
    list_reflections, read_reflection, save_entry, save_reflection, sign_up, Dashboard,
    ImageUpload, NewEntryRequest,
};
pub use stats::{
    journal_summary, mood_distribution, weekly_trend, JournalSummary, Week, WeeklyMoodCount,
};
