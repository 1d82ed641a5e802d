//! Credential handling and login sessions.
//!
//! This module provides salted password hashing for the credential table and the
//! session that tracks which user is logged in.
//!
//! # Module Structure
//!
//! - `password`: Argon2 hashing, verification and password prompting
//! - `session`: Login state with an idle timeout
//!
//! # Example
//!
//! ```no_run
//! use gratitude::crypto::Session;
//! use gratitude::store::users::CredentialStore;
//!
//! let users = CredentialStore::new("/tmp/gratitude/users.csv");
//! users.register("ana", "correct horse")?;
//!
//! let mut session = Session::new(30); // 30-minute timeout
//! session.login(&users, "ana", "correct horse")?;
//! assert_eq!(session.username()?, "ana");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod password;
pub mod session;

// Re-export commonly used types
pub use self::password::{hash_password, prompt_password, verify_password};
pub use self::session::Session;
