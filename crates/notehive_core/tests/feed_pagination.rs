use notehive_core::db::open_db_in_memory;
use notehive_core::{
    Identity, NewUser, NoteId, NoteService, SqliteNoteRepository, SqliteUserRepository,
    UserRepository, FEED_LIMIT,
};

fn create_account(conn: &rusqlite::Connection, username: &str) -> Identity {
    let repo = SqliteUserRepository::new(conn);
    let user = repo
        .create_user(&NewUser::new(
            username,
            format!("{username}@example.com"),
            "$argon2id$placeholder",
        ))
        .unwrap();
    Identity::new(user.id)
}

fn create_notes(service: &NoteService<SqliteNoteRepository<'_>>, author: Identity, count: usize) {
    for index in 1..=count {
        service
            .create_note(Some(author), &format!("note {index}"))
            .unwrap();
    }
}

fn ids(notes: &[notehive_core::Note]) -> Vec<NoteId> {
    notes.iter().map(|note| note.id).collect()
}

#[test]
fn exactly_one_full_page_has_no_next_page() {
    let mut conn = open_db_in_memory().unwrap();
    let author = create_account(&conn, "author");
    let service = NoteService::new(SqliteNoteRepository::new(&mut conn));
    create_notes(&service, author, 10);

    let page = service.note_feed(None).unwrap();
    assert_eq!(ids(&page.notes), (1..=10).rev().collect::<Vec<NoteId>>());
    assert!(!page.has_next_page);
    assert_eq!(page.cursor, Some(1));
}

#[test]
fn fifteen_notes_paginate_into_ten_then_five() {
    let mut conn = open_db_in_memory().unwrap();
    let author = create_account(&conn, "author");
    let service = NoteService::new(SqliteNoteRepository::new(&mut conn));
    create_notes(&service, author, 15);

    let first = service.note_feed(None).unwrap();
    assert_eq!(ids(&first.notes), (6..=15).rev().collect::<Vec<NoteId>>());
    assert!(first.has_next_page);
    assert_eq!(first.cursor, Some(6));

    let second = service.note_feed(first.cursor).unwrap();
    assert_eq!(ids(&second.notes), (1..=5).rev().collect::<Vec<NoteId>>());
    assert!(!second.has_next_page);
    assert_eq!(second.cursor, Some(1));
}

#[test]
fn empty_store_returns_empty_page_without_faulting() {
    let mut conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::new(&mut conn));

    let page = service.note_feed(None).unwrap();
    assert!(page.notes.is_empty());
    assert!(!page.has_next_page);
    assert_eq!(page.cursor, None);
}

#[test]
fn cursor_past_the_oldest_note_yields_an_empty_page() {
    let mut conn = open_db_in_memory().unwrap();
    let author = create_account(&conn, "author");
    let service = NoteService::new(SqliteNoteRepository::new(&mut conn));
    create_notes(&service, author, 3);

    let page = service.note_feed(Some(1)).unwrap();
    assert!(page.notes.is_empty());
    assert!(!page.has_next_page);
    assert_eq!(page.cursor, None);
}

#[test]
fn pages_never_exceed_the_limit_and_never_overlap() {
    let mut conn = open_db_in_memory().unwrap();
    let author = create_account(&conn, "author");
    let service = NoteService::new(SqliteNoteRepository::new(&mut conn));
    create_notes(&service, author, 37);

    let mut seen: Vec<NoteId> = Vec::new();
    let mut cursor = None;
    loop {
        let page = service.note_feed(cursor).unwrap();
        assert!(page.notes.len() <= FEED_LIMIT as usize);
        for id in ids(&page.notes) {
            assert!(!seen.contains(&id), "id {id} delivered twice");
            seen.push(id);
        }
        if !page.has_next_page {
            break;
        }
        cursor = page.cursor;
    }

    assert_eq!(seen, (1..=37).rev().collect::<Vec<NoteId>>());
}

#[test]
fn notes_listing_is_bounded_to_one_hundred() {
    let mut conn = open_db_in_memory().unwrap();
    let author = create_account(&conn, "author");
    let service = NoteService::new(SqliteNoteRepository::new(&mut conn));
    create_notes(&service, author, 105);

    let listed = service.notes().unwrap();
    assert_eq!(listed.len(), 100);
    // Newest first.
    assert_eq!(listed.first().map(|note| note.id), Some(105));
}
