//! Credential Store.
//!
//! Holds one row per registered user in a `username,password_hash` table.
//! Users are never updated or removed; every registration rewrites the table.

use super::TableFile;
use crate::constants;
use crate::crypto::password::{hash_password, verify_password};
use crate::errors::{AppError, AppResult, AuthError};
use crate::journal_core::{require_non_blank, validate_name_component};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// A row of the credential table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
}

/// CSV-backed store of registered users.
pub struct CredentialStore {
    table: TableFile<UserRecord>,
}

impl CredentialStore {
    /// Opens the credential table at `path`. The file is created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore {
            table: TableFile::new(path, constants::USERS_HEADER),
        }
    }

    /// Registers a new user.
    ///
    /// Usernames are case-sensitive and must be usable as a file name component.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` if the username or password is blank, or the
    ///   username contains path separators or control characters
    /// - `AuthError::DuplicateUser` if the username is already registered
    pub fn register(&self, username: &str, password: &str) -> AppResult<()> {
        self.insert(username, password, false)?;
        info!("Registered a new user");
        Ok(())
    }

    /// Creates the first account of a fresh installation.
    ///
    /// This is the explicit replacement for a built-in default login: it only
    /// succeeds while the credential table is empty.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if any user already exists, plus everything
    /// `register` can return.
    pub fn bootstrap_admin(&self, username: &str, password: &str) -> AppResult<()> {
        self.insert(username, password, true)?;
        info!("Bootstrapped the first account");
        Ok(())
    }

    /// Returns `true` iff `username` exists and `password` matches its hash.
    pub fn authenticate(&self, username: &str, password: &str) -> AppResult<bool> {
        let users = self.table.load()?;

        match users.iter().find(|user| user.username == username) {
            Some(user) => verify_password(password, &user.password_hash),
            None => {
                debug!("Authentication attempted for an unknown user");
                Ok(false)
            }
        }
    }

    /// Returns `true` if `username` is registered.
    pub fn exists(&self, username: &str) -> AppResult<bool> {
        Ok(self
            .table
            .load()?
            .iter()
            .any(|user| user.username == username))
    }

    /// Number of registered users.
    pub fn count(&self) -> AppResult<usize> {
        Ok(self.table.load()?.len())
    }

    fn insert(&self, username: &str, password: &str, require_empty: bool) -> AppResult<()> {
        validate_name_component("Username", username)?;
        require_non_blank("Password", password)?;

        // Hashing is slow; do it before taking the table lock.
        let password_hash = hash_password(password)?;

        self.table.transaction(|users| {
            if require_empty && !users.is_empty() {
                return Err(AppError::Validation(
                    "Accounts already exist; register additional users instead".to_string(),
                ));
            }

            if users.iter().any(|user| user.username == username) {
                return Err(AuthError::DuplicateUser {
                    username: username.to_string(),
                }
                .into());
            }

            users.push(UserRecord {
                username: username.to_string(),
                password_hash,
            });
            Ok(())
        })
    }
}
