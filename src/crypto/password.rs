//! Salted password hashing for the credential table.
//!
//! Passwords are hashed with Argon2id and a random salt and stored as PHC
//! strings (`$argon2id$v=19$...`). The plaintext is never written to disk.

use crate::constants;
use crate::errors::{AppError, AppResult, AuthError};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::debug;
use zeroize::Zeroizing;

/// Hashes a password with a fresh random salt.
///
/// # Example
///
/// ```
/// use gratitude::crypto::{hash_password, verify_password};
///
/// let hash = hash_password("admin123")?;
/// assert!(hash.starts_with("$argon2"));
/// assert!(verify_password("admin123", &hash)?);
/// assert!(!verify_password("admin124", &hash)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks a password against a stored PHC hash string.
///
/// Returns `Ok(false)` for a wrong password; an unparseable hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hash(e.to_string()).into()),
    }
}

/// Reads a password from `GRATITUDE_PASSWORD` or prompts for it without echo.
///
/// With `confirm` set, an interactive prompt asks twice and rejects a mismatch.
/// The environment variable exists for scripted and non-interactive use and is
/// never asked for confirmation.
///
/// # Errors
///
/// Returns `AppError::Validation` if the confirmation does not match, or
/// `AppError::Io` if the terminal cannot be read.
pub fn prompt_password(prompt: &str, confirm: bool) -> AppResult<Zeroizing<String>> {
    if let Ok(password) = std::env::var(constants::ENV_VAR_PASSWORD) {
        debug!("Using password from {}", constants::ENV_VAR_PASSWORD);
        return Ok(Zeroizing::new(password));
    }

    let password = Zeroizing::new(rpassword::prompt_password(prompt)?);

    if confirm {
        let confirmation = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);
        if *password != *confirmation {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
    }

    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_hash_is_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("same password", &first).unwrap());
        assert!(verify_password("same password", &second).unwrap());
    }

    #[test]
    fn test_hash_does_not_contain_plaintext() {
        let hash = hash_password("admin123").unwrap();
        assert!(!hash.contains("admin123"));
    }

    #[test]
    fn test_wrong_password_is_false_not_error() {
        let hash = hash_password("secret").unwrap();
        assert!(!verify_password("Secret", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        match verify_password("secret", "secret") {
            Err(AppError::Auth(AuthError::Hash(_))) => {}
            other => panic!("Expected AuthError::Hash, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_prompt_password_uses_env_var() {
        std::env::set_var(constants::ENV_VAR_PASSWORD, "from-env");

        let password = prompt_password("Password: ", true).unwrap();
        assert_eq!(password.as_str(), "from-env");

        std::env::remove_var(constants::ENV_VAR_PASSWORD);
    }
}
