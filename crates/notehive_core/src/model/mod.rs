//! Domain model for accounts, notes and session identities.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep normalization rules (email, avatar derivation) next to the records
//!   they feed.
//!
//! # Invariants
//! - Every user is identified by a stable `UserId`; every note by a
//!   store-assigned, monotonically increasing `NoteId`.
//! - `Note::favorite_count` always equals the cardinality of
//!   `Note::favorited_by`.

pub mod note;
pub mod user;
