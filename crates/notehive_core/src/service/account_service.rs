//! Account use-case service: sign-up, sign-in and user queries.
//!
//! # Responsibility
//! - Validate and normalize sign-up input, hash the password, persist the
//!   account and issue the session token.
//! - Authenticate sign-in by `{username} OR {email}` without revealing which
//!   factor failed.
//!
//! # Invariants
//! - Emails are normalized (trim + lower-case) before storage and lookup.
//! - Unknown user and wrong password produce the identical error value.
//! - `users()` never returns more than [`MAX_QUERY_ENTITIES`] records.

use crate::auth::{hash_password, validate_password, verify_password, Identity, SessionSigner};
use crate::model::user::{normalize_email, NewUser, User};
use crate::repo::user_repo::{Login, UserRepository};
use crate::repo::RepoError;
use crate::service::{require_identity, ServiceError, MAX_QUERY_ENTITIES};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

/// Single rejection value for every sign-in failure mode.
const SIGN_IN_REJECTION: &str = "incorrect username, email, or password";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Account service facade over a user repository and the session signer.
pub struct AccountService<R: UserRepository> {
    repo: R,
    signer: SessionSigner,
}

impl<R: UserRepository> AccountService<R> {
    /// Creates a service using the provided repository and signer.
    pub fn new(repo: R, signer: SessionSigner) -> Self {
        Self { repo, signer }
    }

    /// Registers a new account and returns a signed session token.
    ///
    /// # Errors
    /// - `Validation` for empty username, malformed email or short password.
    /// - `AccountCreation` when the store rejects the record (duplicate
    ///   username or email).
    pub fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::Validation(
                "username cannot be empty".to_string(),
            ));
        }

        let email = normalize_email(email);
        if !EMAIL_RE.is_match(&email) {
            return Err(ServiceError::Validation(format!(
                "`{email}` is not a valid email address"
            )));
        }

        if let Some(reason) = validate_password(password) {
            return Err(ServiceError::Validation(reason));
        }

        let password_hash =
            hash_password(password).map_err(|err| ServiceError::Internal(err.to_string()))?;

        let record = NewUser::new(username, email, password_hash);
        let user = match self.repo.create_user(&record) {
            Ok(user) => user,
            Err(RepoError::Conflict(detail)) => {
                warn!(
                    "event=sign_up module=account status=rejected error_code=conflict detail={detail}"
                );
                return Err(ServiceError::AccountCreation(
                    "error creating account".to_string(),
                ));
            }
            Err(other) => return Err(other.into()),
        };

        info!(
            "event=sign_up module=account status=ok user_id={}",
            user.id
        );
        Ok(self.signer.issue(user.id))
    }

    /// Authenticates by username or email and returns a session token.
    ///
    /// Unknown user and wrong password share one error value; the message
    /// never identifies the failing factor.
    pub fn sign_in(&self, login: &Login, password: &str) -> Result<String, ServiceError> {
        let login = Login {
            username: login.username.clone(),
            email: login.email.as_deref().map(normalize_email),
        };

        let credentials = self
            .repo
            .find_credentials(&login)?
            .ok_or(ServiceError::Authentication(SIGN_IN_REJECTION))?;

        if !verify_password(password, &credentials.password_hash) {
            return Err(ServiceError::Authentication(SIGN_IN_REJECTION));
        }

        info!(
            "event=sign_in module=account status=ok user_id={}",
            credentials.user_id
        );
        Ok(self.signer.issue(credentials.user_id))
    }

    /// Returns the signed-in caller's own account record.
    pub fn me(&self, identity: Option<Identity>) -> Result<User, ServiceError> {
        let identity = require_identity(identity)?;
        self.repo
            .find_by_id(identity.user_id)?
            .ok_or(ServiceError::UserNotFound(identity.user_id))
    }

    /// Looks up one account by exact username.
    pub fn user(&self, username: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.repo.find_by_username(username)?)
    }

    /// Lists accounts, bounded to [`MAX_QUERY_ENTITIES`].
    pub fn users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.repo.list_users(MAX_QUERY_ENTITIES)?)
    }
}
