//! User account model.
//!
//! # Responsibility
//! - Define the public account record exposed to API callers.
//! - Own email normalization and derived-avatar rules.
//!
//! # Invariants
//! - `User` never carries the password hash; only the sign-in path reads it
//!   from storage.
//! - Emails are persisted in normalized form (trimmed, lower-cased).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for user accounts.
pub type UserId = Uuid;

/// Public account record.
///
/// The password hash is intentionally absent: it lives in the users table and
/// is surfaced only through [`crate::repo::user_repo::StoredCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable store-assigned id, never reused.
    pub id: UserId,
    /// Unique display handle.
    pub username: String,
    /// Normalized unique email.
    pub email: String,
    /// Derived avatar URL. Not authoritative; recomputable from the email.
    pub avatar: String,
    /// Unix epoch milliseconds, set by the store on insert.
    pub created_at: i64,
}

/// Insert shape for sign-up. Carries the already-hashed password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
}

impl NewUser {
    /// Builds an insert record with a fresh id and a derived avatar.
    ///
    /// The email must already be normalized and the password already hashed;
    /// this constructor does not validate either.
    pub fn new(
        username: impl Into<String>,
        normalized_email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let email = normalized_email.into();
        let avatar = derive_avatar_url(&email);
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email,
            password_hash: password_hash.into(),
            avatar,
        }
    }
}

/// Normalizes an email for lookup and storage: trim, then lower-case.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Derives a deterministic avatar URL from a normalized email.
///
/// The digest is a plain blake3 hash of the email bytes; the URL shape matches
/// the common hash-addressed avatar services.
pub fn derive_avatar_url(normalized_email: &str) -> String {
    let digest = blake3::hash(normalized_email.as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?d=identicon",
        hex::encode(digest.as_bytes())
    )
}
