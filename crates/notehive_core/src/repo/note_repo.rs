//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist note records and serve ordered retrieval for lists and the
//!   keyset-paginated feed.
//! - Own the atomic favorite-toggle: membership flip and counter update are
//!   one store operation.
//!
//! # Invariants
//! - `favorite_count` equals the row count in `note_favorites` for that note
//!   after every committed toggle.
//! - `toggle_favorite` runs inside a single `IMMEDIATE` transaction; two
//!   interleaved toggles by different callers cannot lose an update.
//! - Feed pages are ordered by `id DESC`; a cursor selects strictly older
//!   notes only.

use crate::model::note::{Note, NoteId};
use crate::model::user::UserId;
use crate::repo::user_repo::parse_user_id;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    content,
    author,
    favorite_count,
    created_at,
    updated_at
FROM notes";

/// Repository interface for note persistence and the favorite set.
pub trait NoteRepository {
    /// Persists a new note with an empty favorite set and returns it.
    fn create_note(&self, author: UserId, content: &str) -> RepoResult<Note>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists up to `limit` notes, newest first.
    fn list_notes(&self, limit: u32) -> RepoResult<Vec<Note>>;
    /// Keyset page: up to `limit` notes with `id < before` (all when absent),
    /// newest first.
    fn list_page(&self, before: Option<NoteId>, limit: u32) -> RepoResult<Vec<Note>>;
    /// Replaces note content and refreshes `updated_at`.
    fn update_content(&self, id: NoteId, content: &str) -> RepoResult<()>;
    /// Hard-deletes a note and its favorite rows.
    fn delete_note(&mut self, id: NoteId) -> RepoResult<()>;
    /// Flips `user_id` membership in the favorite set and moves the counter
    /// by ±1, atomically. Returns the note as of after the flip.
    fn toggle_favorite(&mut self, id: NoteId, user_id: UserId) -> RepoResult<Note>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, author: UserId, content: &str) -> RepoResult<Note> {
        self.conn.execute(
            "INSERT INTO notes (content, author) VALUES (?1, ?2);",
            params![content, author.to_string()],
        )?;
        let id = self.conn.last_insert_rowid();

        load_note(&*self.conn, id)?.ok_or(RepoError::InvalidData(
            "created note not found in read-back".to_string(),
        ))
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        load_note(&*self.conn, id)
    }

    fn list_notes(&self, limit: u32) -> RepoResult<Vec<Note>> {
        self.list_page(None, limit)
    }

    fn list_page(&self, before: Option<NoteId>, limit: u32) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE (?1 IS NULL OR id < ?1)
             ORDER BY id DESC
             LIMIT ?2;"
        ))?;
        let mut rows = stmt.query(params![before, i64::from(limit)])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let note = note_from_row(row)?;
            let favorited_by = load_favorited_by(&*self.conn, note.id)?;
            notes.push(Note {
                favorited_by,
                ..note
            });
        }
        Ok(notes)
    }

    fn update_content(&self, id: NoteId, content: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET content = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, content],
        )?;

        if changed == 0 {
            return Err(RepoError::NoteNotFound(id));
        }
        Ok(())
    }

    fn delete_note(&mut self, id: NoteId) -> RepoResult<()> {
        // Favorite rows go with the note via ON DELETE CASCADE.
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NoteNotFound(id));
        }
        Ok(())
    }

    fn toggle_favorite(&mut self, id: NoteId, user_id: UserId) -> RepoResult<Note> {
        let user_id_text = user_id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !note_exists_in_tx(&tx, id)? {
            return Err(RepoError::NoteNotFound(id));
        }

        // Membership test and flip are one statement each; the IMMEDIATE
        // transaction holds the write lock across test + counter update.
        let removed = tx.execute(
            "DELETE FROM note_favorites WHERE note_id = ?1 AND user_id = ?2;",
            params![id, user_id_text],
        )?;

        let delta: i64 = if removed == 0 {
            tx.execute(
                "INSERT INTO note_favorites (note_id, user_id) VALUES (?1, ?2);",
                params![id, user_id_text],
            )?;
            1
        } else {
            -1
        };

        tx.execute(
            "UPDATE notes SET favorite_count = favorite_count + ?2 WHERE id = ?1;",
            params![id, delta],
        )?;

        let note = load_note(&tx, id)?.ok_or(RepoError::InvalidData(
            "toggled note not found in read-back".to_string(),
        ))?;
        tx.commit()?;
        Ok(note)
    }
}

fn load_note(conn: &Connection, id: NoteId) -> RepoResult<Option<Note>> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => {
            let note = note_from_row(row)?;
            let favorited_by = load_favorited_by(conn, note.id)?;
            Ok(Some(Note {
                favorited_by,
                ..note
            }))
        }
        None => Ok(None),
    }
}

fn note_from_row(row: &Row<'_>) -> RepoResult<Note> {
    let author_text: String = row.get("author")?;
    Ok(Note {
        id: row.get("id")?,
        content: row.get("content")?,
        author: parse_user_id(&author_text)?,
        favorited_by: Vec::new(),
        favorite_count: row.get("favorite_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_favorited_by(conn: &Connection, note_id: NoteId) -> RepoResult<Vec<UserId>> {
    let mut stmt = conn.prepare(
        "SELECT user_id
         FROM note_favorites
         WHERE note_id = ?1
         ORDER BY rowid ASC;",
    )?;
    let mut rows = stmt.query([note_id])?;
    let mut users = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        users.push(parse_user_id(&value)?);
    }
    Ok(users)
}

fn note_exists_in_tx(conn: &Connection, id: NoteId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
