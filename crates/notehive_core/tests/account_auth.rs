use notehive_core::db::open_db_in_memory;
use notehive_core::{AccountService, Login, ServiceError, SessionSigner, SqliteUserRepository};

fn service(conn: &rusqlite::Connection) -> AccountService<SqliteUserRepository<'_>> {
    AccountService::new(
        SqliteUserRepository::new(conn),
        SessionSigner::from_secret("integration secret"),
    )
}

#[test]
fn sign_up_token_resolves_to_stored_account() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    let signer = SessionSigner::from_secret("integration secret");

    let token = accounts
        .sign_up("jane", "  Jane@Example.COM ", "a strong password")
        .unwrap();

    let identity = signer.resolve(&token).expect("issued token should verify");
    let me = accounts.me(Some(identity)).unwrap();
    assert_eq!(me.id, identity.user_id);
    assert_eq!(me.username, "jane");
    assert_eq!(me.email, "jane@example.com");
    assert!(me.avatar.starts_with("https://"));
}

#[test]
fn raw_password_is_never_stored() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .sign_up("jane", "jane@example.com", "super-secret-password")
        .unwrap();

    let stored_hash: String = conn
        .query_row(
            "SELECT password_hash FROM users WHERE username = 'jane';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(stored_hash.starts_with("$argon2"));
    assert!(!stored_hash.contains("super-secret-password"));
}

#[test]
fn duplicate_username_or_email_fails_account_creation() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .sign_up("jane", "jane@example.com", "a strong password")
        .unwrap();

    let same_username = accounts.sign_up("jane", "other@example.com", "a strong password");
    assert!(matches!(
        same_username,
        Err(ServiceError::AccountCreation(_))
    ));

    let same_email = accounts.sign_up("janet", "jane@example.com", "a strong password");
    assert!(matches!(same_email, Err(ServiceError::AccountCreation(_))));
}

#[test]
fn sign_up_validates_inputs() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);

    assert!(matches!(
        accounts.sign_up("  ", "jane@example.com", "a strong password"),
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        accounts.sign_up("jane", "not-an-email", "a strong password"),
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        accounts.sign_up("jane", "jane@example.com", "short"),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn sign_in_accepts_username_or_email() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .sign_up("jane", "jane@example.com", "a strong password")
        .unwrap();

    accounts
        .sign_in(&Login::with_username("jane"), "a strong password")
        .expect("username sign-in should succeed");
    accounts
        .sign_in(&Login::with_email("Jane@Example.com"), "a strong password")
        .expect("email sign-in should normalize and succeed");
}

#[test]
fn sign_in_failures_are_indistinguishable() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .sign_up("jane", "jane@example.com", "a strong password")
        .unwrap();

    let wrong_password = accounts
        .sign_in(&Login::with_username("jane"), "not the password")
        .expect_err("wrong password must fail");
    let unknown_user = accounts
        .sign_in(&Login::with_username("nobody"), "a strong password")
        .expect_err("unknown user must fail");

    let wrong_password_message = wrong_password.to_string();
    let unknown_user_message = unknown_user.to_string();
    assert_eq!(wrong_password_message, unknown_user_message);
    assert!(matches!(wrong_password, ServiceError::Authentication(_)));
    assert!(matches!(unknown_user, ServiceError::Authentication(_)));
}

#[test]
fn me_requires_identity_and_user_lookup_is_optional() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .sign_up("jane", "jane@example.com", "a strong password")
        .unwrap();

    assert!(matches!(
        accounts.me(None),
        Err(ServiceError::Authentication(_))
    ));

    let found = accounts.user("jane").unwrap();
    assert_eq!(found.map(|user| user.username), Some("jane".to_string()));
    assert!(accounts.user("nobody").unwrap().is_none());
}

#[test]
fn users_listing_is_bounded_to_one_hundred() {
    use notehive_core::{NewUser, UserRepository};

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);
    // Repo-level inserts with a placeholder hash; hashing 105 passwords would
    // dominate the test run.
    for index in 0..105 {
        repo.create_user(&NewUser::new(
            format!("user{index}"),
            format!("user{index}@example.com"),
            "$argon2id$placeholder",
        ))
        .unwrap();
    }

    let accounts = service(&conn);
    let listed = accounts.users().unwrap();
    assert_eq!(listed.len(), 100);
}
