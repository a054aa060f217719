//! Session authentication primitives.
//!
//! # Responsibility
//! - Hash and verify account passwords.
//! - Issue and resolve signed bearer tokens.
//!
//! # Invariants
//! - A token that fails verification resolves to "no identity", never to a
//!   fault; requiring an identity is the caller's decision.
//! - Raw passwords and full tokens are never written to logs.

use crate::model::user::UserId;

pub mod password;
pub mod token;

pub use password::{hash_password, validate_password, verify_password, PasswordHashError};
pub use token::SessionSigner;

/// Authenticated caller, resolved per request from a bearer token.
///
/// Ephemeral by design: holds only the user id and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
}

impl Identity {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
