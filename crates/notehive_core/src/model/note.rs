//! Note domain model.
//!
//! # Responsibility
//! - Define the note record shared by CRUD, favorites and feed use-cases.
//!
//! # Invariants
//! - `id` is store-assigned and monotonically increasing: it doubles as the
//!   feed pagination key.
//! - `favorite_count` equals `favorited_by.len()` on every record read back
//!   from storage.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};

/// Store-assigned note identifier, monotonically increasing by creation.
pub type NoteId = i64;

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable id; also the feed cursor value.
    pub id: NoteId,
    /// Note body. Non-empty by service-level validation.
    pub content: String,
    /// Owning user, set at creation and never changed.
    pub author: UserId,
    /// Users who currently favorite this note. No duplicates.
    pub favorited_by: Vec<UserId>,
    /// Mirror of `favorited_by.len()`, maintained atomically by the store.
    pub favorite_count: i64,
    /// Unix epoch milliseconds, set by the store on insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed by the store on content updates.
    pub updated_at: i64,
}

impl Note {
    /// Returns whether the given user currently favorites this note.
    pub fn is_favorited_by(&self, user_id: UserId) -> bool {
        self.favorited_by.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::Note;
    use uuid::Uuid;

    #[test]
    fn note_serializes_for_api_consumers() {
        let author = Uuid::new_v4();
        let fan = Uuid::new_v4();
        let note = Note {
            id: 42,
            content: "serializable".to_string(),
            author,
            favorited_by: vec![fan],
            favorite_count: 1,
            created_at: 1_700_000_000_000,
            updated_at: 1_700_000_000_500,
        };

        let json = serde_json::to_value(&note).expect("note serializes");
        assert_eq!(json["id"], 42);
        assert_eq!(json["favorite_count"], 1);
        assert_eq!(json["author"], author.to_string());

        let back: Note = serde_json::from_value(json).expect("note deserializes");
        assert_eq!(back, note);
    }
}
