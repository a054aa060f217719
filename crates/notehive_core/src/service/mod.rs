//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate authenticator, authorization gate and repositories into
//!   use-case level APIs.
//! - Define the caller-facing error taxonomy shared by all operations.
//!
//! # Invariants
//! - Authorization and not-found failures are raised before any mutation and
//!   terminate the operation without partial effects.
//! - Sign-in failure messages never reveal which factor failed.

use crate::auth::Identity;
use crate::model::note::{Note, NoteId};
use crate::model::user::UserId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_service;
pub mod note_service;

/// Upper bound for unpaginated `users()` / `notes()` listings.
pub const MAX_QUERY_ENTITIES: u32 = 100;

/// Caller-facing error taxonomy for all core operations.
#[derive(Debug)]
pub enum ServiceError {
    /// No or invalid credentials, or a missing session.
    Authentication(&'static str),
    /// Authenticated but not authorized for this resource.
    Forbidden(&'static str),
    /// Referenced note absent.
    NoteNotFound(NoteId),
    /// Referenced user absent.
    UserNotFound(UserId),
    /// Persistence-level rejection during sign-up.
    AccountCreation(String),
    /// Malformed input (empty content, bad email, short password).
    Validation(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch (hashing failure, read-back miss).
    Internal(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentication(message) => write!(f, "{message}"),
            Self::Forbidden(message) => write!(f, "{message}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::AccountCreation(message) => write!(f, "{message}"),
            Self::Validation(message) => write!(f, "invalid input: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NoteNotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Authorization gate: converts an absent session into an authentication
/// failure.
pub fn require_identity(identity: Option<Identity>) -> Result<Identity, ServiceError> {
    identity.ok_or(ServiceError::Authentication(
        "you must be signed in to perform this action",
    ))
}

/// Authorization gate: only the recorded owner may mutate a note.
///
/// Callers must have resolved the note already; a missing note is a
/// not-found condition decided before this check, never here.
pub fn require_ownership(identity: &Identity, note: &Note) -> Result<(), ServiceError> {
    if note.author != identity.user_id {
        return Err(ServiceError::Forbidden(
            "you do not have permission to modify this note",
        ));
    }
    Ok(())
}
