//! Password hashing and verification.
//!
//! # Responsibility
//! - Produce salted one-way Argon2id hashes in PHC string format.
//! - Verify raw passwords against stored hashes.
//!
//! # Invariants
//! - The raw password is never recoverable from the stored hash.
//! - Verification failure is a `false` result, not an error; the service
//!   layer decides how to report it.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum accepted password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hashing-side failure. Verification never returns this.
#[derive(Debug)]
pub struct PasswordHashError(pub String);

impl Display for PasswordHashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password hashing failed: {}", self.0)
    }
}

impl Error for PasswordHashError {}

/// Validates a raw password against the minimum-length policy.
///
/// Returns a human-readable rejection reason, or `None` when acceptable.
pub fn validate_password(password: &str) -> Option<String> {
    if password.trim().is_empty() {
        return Some("password cannot be empty".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    None
}

/// Hashes a raw password with a fresh random salt (Argon2id, PHC format).
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| PasswordHashError(err.to_string()))?;
    Ok(hash.to_string())
}

/// Verifies a raw password against a stored PHC hash string.
///
/// A malformed stored hash counts as a failed verification; it is logged
/// because it indicates corrupted account data, not caller error.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            error!(
                "event=password_verify module=auth status=error error_code=malformed_stored_hash error={err}"
            );
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::{hash_password, validate_password, verify_password, MIN_PASSWORD_LENGTH};

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("correct horse battery").expect("hashing should succeed");
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same input").expect("hashing should succeed");
        let second = hash_password("same input").expect("hashing should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn stored_hash_never_contains_raw_password() {
        let hash = hash_password("super-secret-value").expect("hashing should succeed");
        assert!(!hash.contains("super-secret-value"));
    }

    #[test]
    fn malformed_stored_hash_fails_verification() {
        assert!(!verify_password("anything", "not a phc string"));
    }

    #[test]
    fn validate_password_enforces_minimum_length() {
        assert!(validate_password("").is_some());
        assert!(validate_password("   ").is_some());
        assert!(validate_password(&"x".repeat(MIN_PASSWORD_LENGTH - 1)).is_some());
        assert!(validate_password(&"x".repeat(MIN_PASSWORD_LENGTH)).is_none());
    }
}
