//! Note use-case service: CRUD, favorite toggle and the paginated feed.
//!
//! # Responsibility
//! - Enforce the session/ownership gates in front of every note mutation.
//! - Convert a store-agnostic cursor into a bounded, ordered feed page.
//!
//! # Invariants
//! - Mutations on a missing note fail with `NoteNotFound` before any write.
//! - Only `delete_note` converts a store-layer failure into a soft `false`.
//! - The feed never indexes into an empty page: zero fetched notes return an
//!   empty page with no cursor.

use crate::auth::Identity;
use crate::model::note::{Note, NoteId};
use crate::model::user::User;
use crate::repo::note_repo::NoteRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::{require_identity, require_ownership, ServiceError, MAX_QUERY_ENTITIES};
use log::{info, warn};

/// Fixed feed page size.
pub const FEED_LIMIT: u32 = 10;

/// One feed page: bounded, newest-first, with a keyset cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPage {
    /// At most [`FEED_LIMIT`] notes, ordered by descending id.
    pub notes: Vec<Note>,
    /// Id of the last returned note; `None` when the page is empty.
    pub cursor: Option<NoteId>,
    /// Whether strictly older notes remain past this page.
    pub has_next_page: bool,
}

/// Note service facade over a note repository.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a note owned by the signed-in caller.
    pub fn create_note(
        &self,
        identity: Option<Identity>,
        content: &str,
    ) -> Result<Note, ServiceError> {
        let identity = require_identity(identity)?;
        validate_content(content)?;

        let note = self.repo.create_note(identity.user_id, content)?;
        info!(
            "event=note_create module=note status=ok note_id={} author={}",
            note.id, note.author
        );
        Ok(note)
    }

    /// Replaces note content. Owner only.
    pub fn update_note(
        &self,
        identity: Option<Identity>,
        id: NoteId,
        content: &str,
    ) -> Result<Note, ServiceError> {
        let identity = require_identity(identity)?;
        let note = self
            .repo
            .get_note(id)?
            .ok_or(ServiceError::NoteNotFound(id))?;
        require_ownership(&identity, &note)?;
        validate_content(content)?;

        self.repo.update_content(id, content)?;
        let updated = self
            .repo
            .get_note(id)?
            .ok_or(ServiceError::Internal(
                "updated note not found in read-back".to_string(),
            ))?;
        info!(
            "event=note_update module=note status=ok note_id={}",
            updated.id
        );
        Ok(updated)
    }

    /// Deletes a note. Owner only.
    ///
    /// Authorization and not-found failures are errors; a store failure
    /// during the delete itself is reported as `Ok(false)`.
    pub fn delete_note(
        &mut self,
        identity: Option<Identity>,
        id: NoteId,
    ) -> Result<bool, ServiceError> {
        let identity = require_identity(identity)?;
        let note = self
            .repo
            .get_note(id)?
            .ok_or(ServiceError::NoteNotFound(id))?;
        require_ownership(&identity, &note)?;

        match self.repo.delete_note(id) {
            Ok(()) => {
                info!("event=note_delete module=note status=ok note_id={id}");
                Ok(true)
            }
            Err(err) => {
                warn!(
                    "event=note_delete module=note status=soft_fail note_id={id} error={err}"
                );
                Ok(false)
            }
        }
    }

    /// Flips the caller's membership in the note's favorite set.
    ///
    /// Any authenticated identity may toggle any note; the flip and its
    /// counter update are atomic at the store.
    pub fn toggle_favorite(
        &mut self,
        identity: Option<Identity>,
        id: NoteId,
    ) -> Result<Note, ServiceError> {
        let identity = require_identity(identity)?;
        let note = self.repo.toggle_favorite(id, identity.user_id)?;
        info!(
            "event=favorite_toggle module=note status=ok note_id={} favorite_count={}",
            note.id, note.favorite_count
        );
        Ok(note)
    }

    /// Gets one note by id.
    pub fn note(&self, id: NoteId) -> Result<Option<Note>, ServiceError> {
        Ok(self.repo.get_note(id)?)
    }

    /// Lists notes newest-first, bounded to [`MAX_QUERY_ENTITIES`].
    pub fn notes(&self) -> Result<Vec<Note>, ServiceError> {
        Ok(self.repo.list_notes(MAX_QUERY_ENTITIES)?)
    }

    /// Returns one feed page starting strictly after `cursor`.
    ///
    /// Fetches `FEED_LIMIT + 1` notes; the extra row only signals that a
    /// next page exists and is never returned.
    pub fn note_feed(&self, cursor: Option<NoteId>) -> Result<FeedPage, ServiceError> {
        let mut notes = self.repo.list_page(cursor, FEED_LIMIT + 1)?;

        let has_next_page = notes.len() > FEED_LIMIT as usize;
        if has_next_page {
            notes.truncate(FEED_LIMIT as usize);
        }

        // Explicit emptiness check: an empty fetch has no "last note".
        let cursor = notes.last().map(|note| note.id);

        Ok(FeedPage {
            notes,
            cursor,
            has_next_page,
        })
    }
}

/// Resolves a note's author reference to the full account record.
pub fn note_author<R: UserRepository>(users: &R, note: &Note) -> Result<Option<User>, ServiceError> {
    Ok(users.find_by_id(note.author)?)
}

/// Resolves a note's favorite set to full account records.
///
/// Users deleted out-of-band are skipped rather than surfaced as errors.
pub fn note_favorited_by<R: UserRepository>(
    users: &R,
    note: &Note,
) -> Result<Vec<User>, ServiceError> {
    let mut resolved = Vec::with_capacity(note.favorited_by.len());
    for user_id in &note.favorited_by {
        if let Some(user) = users.find_by_id(*user_id)? {
            resolved.push(user);
        }
    }
    Ok(resolved)
}

fn validate_content(content: &str) -> Result<(), ServiceError> {
    if content.trim().is_empty() {
        return Err(ServiceError::Validation(
            "note content cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_content;

    #[test]
    fn content_validation_rejects_blank_input() {
        assert!(validate_content("").is_err());
        assert!(validate_content("   \n\t").is_err());
        assert!(validate_content("hello").is_ok());
    }
}
