//! Constants used throughout the application.
//!
//! This module contains all constants used in the gratitude application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "gratitude";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str =
    "A gratitude journal for daily moods, gratitude and affirmations";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the data directory holding tables, uploads and notes.
pub const ENV_VAR_GRATITUDE_DIR: &str = "GRATITUDE_DIR";
/// Environment variable overriding the credential table location.
pub const ENV_VAR_USERS_FILE: &str = "GRATITUDE_USERS_FILE";
/// Environment variable overriding the entry table location.
pub const ENV_VAR_ENTRIES_FILE: &str = "GRATITUDE_ENTRIES_FILE";
/// Environment variable overriding the attachment directory.
pub const ENV_VAR_UPLOADS_DIR: &str = "GRATITUDE_UPLOADS_DIR";
/// Environment variable overriding the reflection directory.
pub const ENV_VAR_REFLECTIONS_DIR: &str = "GRATITUDE_REFLECTIONS_DIR";
/// Environment variable for the session idle timeout in minutes.
pub const ENV_VAR_SESSION_TIMEOUT: &str = "GRATITUDE_SESSION_TIMEOUT";
/// Environment variable supplying the password non-interactively.
pub const ENV_VAR_PASSWORD: &str = "GRATITUDE_PASSWORD";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory for journal data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".local/share/gratitude";
/// Default session idle timeout in minutes.
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: u64 = 30;

// File System Layout
/// File name of the credential table inside the data directory.
pub const USERS_FILE_NAME: &str = "users.csv";
/// File name of the entry table inside the data directory.
pub const ENTRIES_FILE_NAME: &str = "journal_entries.csv";
/// Directory name for uploaded images inside the data directory.
pub const UPLOADS_DIR_NAME: &str = "uploads";
/// Directory name for weekly reflections inside the data directory.
pub const REFLECTIONS_DIR_NAME: &str = "weekly_notes";
/// Extension appended to a table path to name its lock file.
pub const LOCK_FILE_EXTENSION: &str = "lock";
/// File extension for reflection notes.
pub const REFLECTION_FILE_EXTENSION: &str = "txt";
/// Suffix of the default export file name (`{username}_journal.csv`).
pub const EXPORT_FILE_SUFFIX: &str = "_journal.csv";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Table Columns
/// Header row of the credential table.
pub const USERS_HEADER: &[&str] = &["username", "password_hash"];
/// Header row of the entry table.
pub const ENTRIES_HEADER: &[&str] = &[
    "id",
    "username",
    "date",
    "mood",
    "gratitude",
    "affirmation",
    "image_name",
];

// Locking
/// Number of attempts to take a table's write lock before giving up.
pub const LOCK_RETRY_ATTEMPTS: u32 = 50;
/// Pause between lock attempts in milliseconds.
pub const LOCK_RETRY_INTERVAL_MS: u64 = 20;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";

// Validation
/// Characters that may not appear in usernames or attachment names.
pub const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', '\0'];

// Logging Configuration
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
