//! Login session with auto-logout timeout.
//!
//! A session records which user authenticated and when they last used it.
//! Operations that act on a user's journal ask the session for the username,
//! so nothing can read or write entries without a successful login first.

use crate::errors::{AppResult, AuthError};
use crate::store::users::CredentialStore;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Tracks the logged-in user with an idle timeout.
///
/// # Example
///
/// ```no_run
/// use gratitude::crypto::Session;
/// use gratitude::store::users::CredentialStore;
///
/// let users = CredentialStore::new("/tmp/gratitude/users.csv");
/// let mut session = Session::new(30); // 30-minute timeout
///
/// session.login(&users, "ana", "correct horse")?;
/// assert!(session.is_logged_in());
///
/// session.logout();
/// assert!(!session.is_logged_in());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Session {
    username: Option<String>,
    last_access: Option<Instant>,
    timeout: Duration,
}

impl Session {
    /// Create a new, logged-out session with the specified timeout in minutes.
    ///
    /// # Example
    ///
    /// ```
    /// use gratitude::crypto::Session;
    ///
    /// let session = Session::new(30);
    /// assert!(!session.is_logged_in());
    /// ```
    pub fn new(timeout_minutes: u64) -> Self {
        Self::with_timeout(Duration::from_secs(timeout_minutes.saturating_mul(60)))
    }

    /// Create a new, logged-out session with an exact timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            username: None,
            last_access: None,
            timeout,
        }
    }

    /// Authenticates against the credential store and starts the session.
    ///
    /// A failed attempt also ends any session that was active.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the pair does not match a
    /// registered user.
    pub fn login(
        &mut self,
        users: &CredentialStore,
        username: &str,
        password: &str,
    ) -> AppResult<()> {
        if !users.authenticate(username, password)? {
            self.logout();
            return Err(AuthError::InvalidCredentials.into());
        }

        self.username = Some(username.to_string());
        self.last_access = Some(Instant::now());
        info!("Login succeeded");
        Ok(())
    }

    /// Ends the session.
    pub fn logout(&mut self) {
        if self.username.take().is_some() {
            debug!("Session ended");
        }
        self.last_access = None;
    }

    /// Returns `true` if a user is logged in and the timeout has not elapsed.
    pub fn is_logged_in(&self) -> bool {
        match (self.username.as_ref(), self.last_access) {
            (Some(_), Some(last_access)) => last_access.elapsed() < self.timeout,
            _ => false,
        }
    }

    /// Returns the logged-in username and refreshes the idle timer.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotLoggedIn` if nobody has logged in (or after `logout`)
    /// - `AuthError::SessionExpired` if the idle timeout elapsed; the session is
    ///   ended as a side effect
    pub fn username(&mut self) -> AppResult<&str> {
        if self.username.is_none() {
            return Err(AuthError::NotLoggedIn.into());
        }

        if !self.is_logged_in() {
            debug!("Session timed out");
            self.logout();
            return Err(AuthError::SessionExpired.into());
        }

        self.last_access = Some(Instant::now());
        self.username
            .as_deref()
            .ok_or_else(|| AuthError::NotLoggedIn.into())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.logout();
    }
}
