//! Core domain logic for NoteHive, a note-taking service.
//! This crate is the single source of truth for session authorization,
//! feed pagination and favorite-toggle invariants; API layers stay thin.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{Identity, SessionSigner};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId};
pub use model::user::{NewUser, User, UserId};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{Login, SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::AccountService;
pub use service::note_service::{FeedPage, NoteService, FEED_LIMIT};
pub use service::{ServiceError, MAX_QUERY_ENTITIES};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
