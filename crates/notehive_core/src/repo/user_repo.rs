//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist account records and serve lookups by id, username and
//!   username-or-email.
//! - Keep the password hash out of the public `User` shape; only
//!   `find_credentials` reads it.
//!
//! # Invariants
//! - `username` and `email` are unique; duplicates surface as
//!   `RepoError::Conflict`.
//! - Emails are stored normalized; callers normalize before lookup.

use crate::model::user::{NewUser, User, UserId};
use crate::repo::{is_constraint_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const USER_SELECT_SQL: &str = "SELECT
    id,
    username,
    email,
    avatar,
    created_at
FROM users";

/// Sign-in lookup key: either field may satisfy the match.
#[derive(Debug, Clone, Default)]
pub struct Login {
    pub username: Option<String>,
    /// Must be normalized (trimmed, lower-cased) before lookup.
    pub email: Option<String>,
}

impl Login {
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            email: None,
        }
    }

    pub fn with_email(normalized_email: impl Into<String>) -> Self {
        Self {
            username: None,
            email: Some(normalized_email.into()),
        }
    }
}

/// Sign-in verification material. Never exposed past the service layer.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user_id: UserId,
    pub password_hash: String,
}

/// Repository interface for account persistence.
pub trait UserRepository {
    /// Persists a new account and returns the stored record.
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    /// Gets one account by stable id.
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Gets one account by exact username.
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    /// Gets sign-in material by `{username} OR {email}`.
    fn find_credentials(&self, login: &Login) -> RepoResult<Option<StoredCredentials>>;
    /// Lists accounts up to `limit`, oldest first.
    fn list_users(&self, limit: u32) -> RepoResult<Vec<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        let inserted = self.conn.execute(
            "INSERT INTO users (id, username, email, password_hash, avatar)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.id.to_string(),
                user.username,
                user.email,
                user.password_hash,
                user.avatar,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(err) if is_constraint_violation(&err) => {
                return Err(RepoError::Conflict(format!(
                    "username or email already taken: {err}"
                )));
            }
            Err(err) => return Err(err.into()),
        }

        self.find_by_id(user.id)?.ok_or(RepoError::InvalidData(
            "created user not found in read-back".to_string(),
        ))
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(user_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE username = ?1;"))?;
        let mut rows = stmt.query([username])?;
        match rows.next()? {
            Some(row) => Ok(Some(user_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_credentials(&self, login: &Login) -> RepoResult<Option<StoredCredentials>> {
        // NULL guards keep an absent factor from matching anything.
        let mut stmt = self.conn.prepare(
            "SELECT id, password_hash
             FROM users
             WHERE (?1 IS NOT NULL AND username = ?1)
                OR (?2 IS NOT NULL AND email = ?2);",
        )?;
        let mut rows = stmt.query(params![login.username, login.email])?;
        match rows.next()? {
            Some(row) => {
                let id_text: String = row.get("id")?;
                Ok(Some(StoredCredentials {
                    user_id: parse_user_id(&id_text)?,
                    password_hash: row.get("password_hash")?,
                }))
            }
            None => Ok(None),
        }
    }

    fn list_users(&self, limit: u32) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY created_at ASC, id ASC LIMIT ?1;"))?;
        let mut rows = stmt.query([i64::from(limit)])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(user_from_row(row)?);
        }
        Ok(users)
    }
}

fn user_from_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    Ok(User {
        id: parse_user_id(&id_text)?,
        username: row.get("username")?,
        email: row.get("email")?,
        avatar: row.get("avatar")?,
        created_at: row.get("created_at")?,
    })
}

pub(crate) fn parse_user_id(value: &str) -> RepoResult<UserId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in users.id")))
}
