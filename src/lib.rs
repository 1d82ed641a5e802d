/*!
# Gratitude

Gratitude is a small journaling library and CLI for daily gratitude entries. Each
entry records a mood, something the user is grateful for and an affirmation,
optionally with an image. Users can also write free-text weekly reflections and
see how their mood developed over time.

## Core Features

- Password-protected accounts (salted Argon2 hashes, no default login)
- Journal entries with durable ids, edited and deleted by their owner only
- Mood distribution and weekly mood trend
- Image attachments and weekly reflections
- CSV export in the same format as the entry table

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `constants`: File names, headers, environment variables and defaults
- `crypto`: Password hashing and the login session
- `errors`: Error handling infrastructure
- `journal_core`: Pure domain values (moods, entry ids, dates, quotes)
- `ops`: Use cases and mood statistics
- `store`: Flat-file tables, attachments and reflections

## Usage Example

```rust,no_run
use chrono::Local;
use gratitude::crypto::Session;
use gratitude::ops::{self, NewEntryRequest};
use gratitude::store::users::CredentialStore;
use gratitude::{Config, Mood};

fn main() -> gratitude::AppResult<()> {
    let config = Config::load()?;
    ops::initialize_storage(&config)?;

    let users = CredentialStore::new(&config.users_file);
    let mut session = Session::new(config.session_timeout_minutes);
    session.login(&users, "ana", "correct horse")?;

    let today = Local::now().naive_local().date();
    ops::save_entry(
        &config,
        &mut session,
        NewEntryRequest {
            mood: Mood::Happy,
            gratitude: "A long walk".to_string(),
            affirmation: "I take care of myself".to_string(),
            image: None,
        },
        today,
    )?;

    let dashboard = ops::dashboard(&config, &mut session, today)?;
    println!("{} entries so far", dashboard.summary.total_entries);
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Password hashing and login sessions
pub mod crypto;
/// Error types and utilities for error handling
pub mod errors;
/// Core journal values without I/O
pub mod journal_core;
/// High-level journal operations and statistics
pub mod ops;
/// Flat-file storage
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use journal_core::{EntryId, Mood};
