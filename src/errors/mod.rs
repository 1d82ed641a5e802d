//! Error handling utilities for the gratitude application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Every variant is recoverable: the caller is expected to show the message and
//! let the user retry. Nothing in the library aborts the process.

use crate::journal_core::EntryId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents errors that can occur when registering users or checking who is logged in.
///
/// # Examples
///
/// ```
/// use gratitude::errors::AuthError;
///
/// let error = AuthError::DuplicateUser {
///     username: "ana".to_string(),
/// };
/// assert!(format!("{}", error).contains("already exists"));
/// assert!(format!("{}", error).contains("ana"));
/// ```
#[derive(Debug, Error)]
pub enum AuthError {
    /// Registration conflict: the username is already taken.
    #[error("Username '{username}' already exists. Choose another username.")]
    DuplicateUser {
        /// The username that was already present
        username: String,
    },

    /// Login mismatch. Deliberately does not say which half was wrong.
    #[error("Invalid credentials. Check your username and password and try again.")]
    InvalidCredentials,

    /// An operation that needs a user was attempted without logging in.
    #[error("Not logged in. Log in with your username and password first.")]
    NotLoggedIn,

    /// The session was idle for longer than the configured timeout.
    #[error("Session expired after inactivity. Log in again to continue.\n\nNote: the timeout is configurable via GRATITUDE_SESSION_TIMEOUT.")]
    SessionExpired,

    /// Password hashing or hash parsing failed.
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Represents errors raised by the flat-file stores.
///
/// # Examples
///
/// ```
/// use gratitude::errors::StoreError;
/// use std::path::PathBuf;
///
/// let error = StoreError::MissingFile {
///     path: PathBuf::from("/data/uploads/cat.png"),
/// };
/// assert!(format!("{}", error).contains("cat.png"));
/// ```
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry carries the given id (deleted, or owned by someone else).
    #[error("Entry not found: {0}. It may have been deleted; reload your entries and try again.")]
    NotFound(EntryId),

    /// A file that was expected to exist is absent.
    #[error("File not found: {path}")]
    MissingFile {
        /// The path that was looked up
        path: PathBuf,
    },

    /// The table on disk does not have the columns this version writes.
    #[error("Unexpected columns in {path}: found '{found}', expected '{expected}'. The file may belong to an older version of the journal.")]
    SchemaMismatch {
        /// The table file
        path: PathBuf,
        /// The header found on disk
        found: String,
        /// The header this version expects
        expected: String,
    },

    /// A row could not be read or written as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Represents errors that can occur when locking a table for a write.
///
/// # Examples
///
/// ```
/// use gratitude::errors::LockError;
/// use std::path::PathBuf;
///
/// let error = LockError::FileBusy {
///     path: PathBuf::from("/data/journal_entries.csv"),
/// };
///
/// assert!(format!("{}", error).contains("currently being written"));
/// ```
#[derive(Debug, Error)]
pub enum LockError {
    /// Another writer held the lock for longer than the retry budget.
    #[error("Table is currently being written by another process: {path}. Please wait a moment and try again.")]
    FileBusy {
        /// The table that is locked
        path: PathBuf,
    },

    /// Error when acquiring the lock fails for a technical reason.
    #[error("Failed to acquire lock for {path}: {source}. Please check file permissions and ensure the directory is accessible.")]
    AcquisitionFailed {
        /// The lock file that couldn't be opened or locked
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the gratitude application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a validation error:
/// ```
/// use gratitude::errors::AppError;
///
/// let error = AppError::Validation("Gratitude cannot be empty".to_string());
/// assert_eq!(format!("{}", error), "Invalid input: Gratitude cannot be empty");
/// ```
///
/// Converting from an IO error:
/// ```
/// use gratitude::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field was empty or malformed.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Registration, login and session errors.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Errors raised by the table, attachment and reflection stores.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Errors related to locking a table for writing.
    #[error("File locking error: {0}")]
    Lock(#[from] LockError),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Store(StoreError::Csv(err))
    }
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use gratitude::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Validation("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
