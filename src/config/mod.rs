//! Configuration management for the gratitude application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. All table, upload and reflection locations are
//! carried in an explicit `Config` that is handed to every store at construction.
//!
//! # Environment Variables
//!
//! - `GRATITUDE_DIR`: Data directory (defaults to ~/.local/share/gratitude)
//! - `GRATITUDE_USERS_FILE`: Credential table (defaults to `$GRATITUDE_DIR/users.csv`)
//! - `GRATITUDE_ENTRIES_FILE`: Entry table (defaults to `$GRATITUDE_DIR/journal_entries.csv`)
//! - `GRATITUDE_UPLOADS_DIR`: Image directory (defaults to `$GRATITUDE_DIR/uploads`)
//! - `GRATITUDE_REFLECTIONS_DIR`: Reflection directory (defaults to `$GRATITUDE_DIR/weekly_notes`)
//! - `GRATITUDE_SESSION_TIMEOUT`: Session idle timeout in minutes (defaults to 30).
//!   Only long-lived library sessions can reach it; every `gratitude` command logs
//!   in afresh and ends its session on exit.
//! - `HOME`: Used for expanding the default data directory path

use crate::constants;
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for the gratitude application.
///
/// # Examples
///
/// Building the default layout under a directory:
/// ```
/// use gratitude::Config;
/// use std::path::PathBuf;
///
/// let config = Config::with_data_dir("/srv/journal");
/// assert_eq!(config.users_file, PathBuf::from("/srv/journal/users.csv"));
/// assert_eq!(config.uploads_dir, PathBuf::from("/srv/journal/uploads"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Directory holding the default layout.
    pub data_dir: PathBuf,

    /// Credential table (`username,password_hash`).
    pub users_file: PathBuf,

    /// Entry table (`id,username,date,mood,gratitude,affirmation,image_name`).
    pub entries_file: PathBuf,

    /// Flat directory of uploaded images keyed by original file name.
    pub uploads_dir: PathBuf,

    /// Directory of `{username}_{date}.txt` reflection notes.
    pub reflections_dir: PathBuf,

    /// Minutes of inactivity after which a session expires.
    ///
    /// Applies to `Session`s held across calls by library callers. The CLI
    /// authenticates on each invocation, so its sessions never sit idle.
    pub session_timeout_minutes: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &"[REDACTED_PATH]")
            .field("users_file", &"[REDACTED_PATH]")
            .field("entries_file", &"[REDACTED_PATH]")
            .field("uploads_dir", &"[REDACTED_PATH]")
            .field("reflections_dir", &"[REDACTED_PATH]")
            .field("session_timeout_minutes", &self.session_timeout_minutes)
            .finish()
    }
}

impl Config {
    /// Creates a configuration using the default file layout under `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Config {
            users_file: data_dir.join(constants::USERS_FILE_NAME),
            entries_file: data_dir.join(constants::ENTRIES_FILE_NAME),
            uploads_dir: data_dir.join(constants::UPLOADS_DIR_NAME),
            reflections_dir: data_dir.join(constants::REFLECTIONS_DIR_NAME),
            session_timeout_minutes: constants::DEFAULT_SESSION_TIMEOUT_MINUTES,
            data_dir,
        }
    }

    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// Paths are expanded with `shellexpand`, so `~` and `$VAR` references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - A path expansion fails
    /// - The data directory resolves to an empty path
    /// - The session timeout is not a positive integer
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(constants::ENV_VAR_GRATITUDE_DIR).unwrap_or_else(|_| {
            let home = env::var(constants::ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, constants::DEFAULT_DATA_SUBDIR)
        });

        let data_dir = expand_path(&data_dir_str)?;
        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let mut config = Config::with_data_dir(data_dir);

        if let Some(path) = env_path(constants::ENV_VAR_USERS_FILE)? {
            config.users_file = path;
        }
        if let Some(path) = env_path(constants::ENV_VAR_ENTRIES_FILE)? {
            config.entries_file = path;
        }
        if let Some(path) = env_path(constants::ENV_VAR_UPLOADS_DIR)? {
            config.uploads_dir = path;
        }
        if let Some(path) = env_path(constants::ENV_VAR_REFLECTIONS_DIR)? {
            config.reflections_dir = path;
        }

        if let Ok(raw) = env::var(constants::ENV_VAR_SESSION_TIMEOUT) {
            config.session_timeout_minutes = raw.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "{} must be a whole number of minutes, got '{}'",
                    constants::ENV_VAR_SESSION_TIMEOUT,
                    raw
                ))
            })?;
        }

        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// Every path must be non-empty and absolute, and the session timeout must be
    /// positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use gratitude::Config;
    ///
    /// let mut config = Config::with_data_dir("relative/dir");
    /// assert!(config.validate().is_err());
    ///
    /// config = Config::with_data_dir("/absolute/dir");
    /// config.session_timeout_minutes = 0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        let paths = [
            ("Data directory", &self.data_dir),
            ("Users file", &self.users_file),
            ("Entries file", &self.entries_file),
            ("Uploads directory", &self.uploads_dir),
            ("Reflections directory", &self.reflections_dir),
        ];

        for (name, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(AppError::Config(format!("{} path is empty", name)));
            }
            if !path.is_absolute() {
                return Err(AppError::Config(format!(
                    "{} must be an absolute path",
                    name
                )));
            }
        }

        if self.session_timeout_minutes == 0 {
            return Err(AppError::Config(
                "Session timeout must be at least one minute".to_string(),
            ));
        }

        Ok(())
    }
}

fn expand_path(raw: &str) -> AppResult<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

fn env_path(var: &str) -> AppResult<Option<PathBuf>> {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => expand_path(&raw).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::tempdir;

    const ALL_VARS: &[&str] = &[
        constants::ENV_VAR_GRATITUDE_DIR,
        constants::ENV_VAR_USERS_FILE,
        constants::ENV_VAR_ENTRIES_FILE,
        constants::ENV_VAR_UPLOADS_DIR,
        constants::ENV_VAR_REFLECTIONS_DIR,
        constants::ENV_VAR_SESSION_TIMEOUT,
    ];

    fn clear_env() {
        for var in ALL_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_debug_impl_redacts_paths() {
        let config = Config::with_data_dir("/home/username/private/journal");

        let debug_output = format!("{:?}", config);

        assert!(debug_output.contains("[REDACTED_PATH]"));
        assert!(!debug_output.contains("/home/username/private/journal"));
    }

    #[test]
    fn test_with_data_dir_layout() {
        let config = Config::with_data_dir("/data");
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.entries_file, PathBuf::from("/data/journal_entries.csv"));
        assert_eq!(config.reflections_dir, PathBuf::from("/data/weekly_notes"));
        assert_eq!(
            config.session_timeout_minutes,
            constants::DEFAULT_SESSION_TIMEOUT_MINUTES
        );
    }

    #[test]
    #[serial]
    fn test_load_with_custom_dir() {
        clear_env();
        let temp_dir = tempdir().unwrap();
        let dir_path = temp_dir.path().to_string_lossy().to_string();

        env::set_var(constants::ENV_VAR_GRATITUDE_DIR, &dir_path);
        let config = Config::load().unwrap();
        clear_env();

        assert_eq!(config.data_dir, PathBuf::from(&dir_path));
        assert_eq!(config.users_file, PathBuf::from(&dir_path).join("users.csv"));
    }

    #[test]
    #[serial]
    fn test_load_with_overrides() {
        clear_env();
        env::set_var(constants::ENV_VAR_GRATITUDE_DIR, "/tmp/gratitude-data");
        env::set_var(constants::ENV_VAR_UPLOADS_DIR, "/tmp/gratitude-images");
        env::set_var(constants::ENV_VAR_SESSION_TIMEOUT, "5");

        let config = Config::load().unwrap();
        clear_env();

        assert_eq!(config.uploads_dir, PathBuf::from("/tmp/gratitude-images"));
        assert_eq!(
            config.entries_file,
            PathBuf::from("/tmp/gratitude-data/journal_entries.csv")
        );
        assert_eq!(config.session_timeout_minutes, 5);
    }

    #[test]
    #[serial]
    fn test_load_rejects_bad_timeout() {
        clear_env();
        env::set_var(constants::ENV_VAR_GRATITUDE_DIR, "/tmp/gratitude-data");
        env::set_var(constants::ENV_VAR_SESSION_TIMEOUT, "soon");

        let result = Config::load();
        clear_env();

        match result {
            Err(AppError::Config(message)) => assert!(message.contains("whole number")),
            _ => panic!("Expected Config error for non-numeric timeout"),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        let temp_dir = tempdir().unwrap();
        let config = Config::with_data_dir(temp_dir.path());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_relative_path() {
        let mut config = Config::with_data_dir("/data");
        config.reflections_dir = PathBuf::from("notes");

        match config.validate() {
            Err(AppError::Config(message)) => {
                assert!(message.contains("Reflections directory"));
                assert!(message.contains("must be an absolute path"));
            }
            _ => panic!("Expected Config error about relative path"),
        }
    }

    #[test]
    fn test_validate_empty_path() {
        let mut config = Config::with_data_dir("/data");
        config.users_file = PathBuf::new();

        match config.validate() {
            Err(AppError::Config(message)) => assert!(message.contains("Users file path is empty")),
            _ => panic!("Expected Config error about empty path"),
        }
    }
}
