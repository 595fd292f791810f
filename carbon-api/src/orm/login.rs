//! Database operations for user authentication and session management.
//!
//! This module provides database layer functions for user login, session creation,
//! password verification, and session storage. It abstracts database operations
//! to support both production and testing environments.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use diesel::prelude::*;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use uuid::Uuid;

use crate::DbConn;
use crate::api::login::LoginRequest;
use crate::models::{NewSession, User};
use crate::orm::testing::FakeDbConn;
use crate::orm::user::get_user_by_email;
use crate::schema::sessions;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Trait for abstracting database operations to support both production and testing.
///
/// This trait allows the same functions to work with both `DbConn` (production)
/// and `FakeDbConn` (testing) by providing a unified interface for database operations.
pub trait DbRunner {
    /// Executes a database operation with a connection.
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static;
}

impl DbRunner for DbConn {
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        DbConn::run(self, f)
    }
}

impl DbRunner for FakeDbConn {
    fn run<F, R>(&self, f: F) -> impl std::future::Future<Output = R>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        FakeDbConn::run(self, f)
    }
}

/// Generates a new UUID-based session token.
fn generate_session_token() -> String {
    Uuid::new_v4().to_string()
}

/// Finds a user by their email address, ignoring case.
///
/// # Returns
/// * `Ok(Some(User))` - User found with matching email
/// * `Ok(None)` - No user found with that email
/// * `Err(Status::InternalServerError)` - Database query failed
pub async fn find_user_by_email<D: DbRunner>(db: &D, email: &str) -> Result<Option<User>, Status> {
    let email = email.to_owned();
    db.run(move |conn| get_user_by_email(conn, &email))
        .await
        .map_err(|e| {
            error!("Failed to look up user by email: {:?}", e);
            Status::InternalServerError
        })
}

/// Verifies a password against a stored Argon2 hash.
///
/// A stored value that is not a valid hash never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// Creates a new session and stores it in the database.
///
/// # Returns
/// * `Ok(String)` - Session token that was created and stored
/// * `Err(Status::InternalServerError)` - Database insertion failed
pub async fn create_and_store_session<D: DbRunner>(db: &D, user_id: i32) -> Result<String, Status> {
    let session_token = generate_session_token();
    let now = Utc::now().naive_utc();

    let new_session = NewSession {
        id: session_token.clone(),
        user_id,
        created_at: now,
        expires_at: None,
        revoked: false,
    };

    db.run(move |conn| {
        diesel::insert_into(sessions::table)
            .values(&new_session)
            .execute(conn)
    })
    .await
    .map_err(|_| Status::InternalServerError)?;

    Ok(session_token)
}

/// Builds the session cookie: HTTP-only, SameSite=Lax, valid for every path.
/// The secure flag is off in tests so the local client sends it back.
fn session_cookie(session_token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_token.to_string()))
        .http_only(true)
        .secure(!cfg!(test))
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

fn set_session_cookie(cookies: &CookieJar<'_>, session_token: &str) {
    cookies.add(session_cookie(session_token));
}

/// Processes a complete login workflow including validation and session creation.
///
/// # Returns
/// * `Ok((Status::Ok, User))` - Login successful, session created and cookie set
/// * `Err(Status::BadRequest)` - Empty email or password provided
/// * `Err(Status::Unauthorized)` - Invalid credentials or user not found
/// * `Err(Status::InternalServerError)` - Database operation failed
///
/// Unknown users and wrong passwords both produce `Unauthorized`.
pub async fn process_login<D: DbRunner>(
    db: &D,
    cookies: &CookieJar<'_>,
    login: &LoginRequest,
) -> Result<(Status, User), Status> {
    if login.email.trim().is_empty() || login.password.trim().is_empty() {
        return Err(Status::BadRequest);
    }

    let user = match find_user_by_email(db, &login.email).await? {
        Some(user) => user,
        None => return Err(Status::Unauthorized),
    };

    if !verify_password(&login.password, &user.password_hash) {
        return Err(Status::Unauthorized);
    }

    let session_token = create_and_store_session(db, user.id).await?;
    set_session_cookie(cookies, &session_token);

    Ok((Status::Ok, user))
}

/// Hashes a password using Argon2 with a random salt.
///
/// # Panics
/// Panics if hashing fails, which does not happen with default parameters.
pub fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("Hashing should succeed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Session, UserInput};
    use crate::orm::testing::{setup_test_db, setup_test_dbconn};
    use crate::orm::user::insert_user;

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct_password");

        assert!(verify_password("correct_password", &hash));
        assert!(!verify_password("wrong_password", &hash));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    /// Inserts a dummy user, returning the inserted row.
    fn insert_dummy_user(conn: &mut diesel::SqliteConnection) -> User {
        let dummy_user = UserInput {
            email: "diya@greenops.example".to_string(),
            password_hash: hash_password("dummy password"),
            is_superuser: false,
        };
        insert_user(conn, dummy_user).expect("insert dummy user")
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let mut conn = setup_test_db();
        let inserted_user = insert_dummy_user(&mut conn);
        let fake_db = setup_test_dbconn(conn);

        let found = find_user_by_email(&fake_db, "Diya@GreenOps.example")
            .await
            .expect("db query should succeed")
            .expect("user should be found");

        assert_eq!(found.id, inserted_user.id);
        assert_eq!(found.password_hash, inserted_user.password_hash);
    }

    #[tokio::test]
    async fn test_create_and_store_session() {
        let mut conn = setup_test_db();
        let inserted_user = insert_dummy_user(&mut conn);
        let fake_db = setup_test_dbconn(conn);

        let session_token = create_and_store_session(&fake_db, inserted_user.id)
            .await
            .expect("session creation should succeed");

        let lookup = session_token.clone();
        let session = fake_db
            .run(move |conn| {
                sessions::table
                    .filter(sessions::id.eq(&lookup))
                    .first::<Session>(conn)
                    .optional()
            })
            .await
            .expect("db query should succeed")
            .expect("session should be stored");

        assert_eq!(session.id, session_token);
        assert_eq!(session.user_id, inserted_user.id);
        assert!(!session.revoked);
        assert!(session.expires_at.is_none());

        let now = Utc::now().naive_utc();
        assert!(session.created_at <= now);
        assert!(session.created_at > now - chrono::Duration::minutes(1));
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("test_session_token_123");

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "test_session_token_123");
        assert!(cookie.http_only().unwrap_or(false));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }
}
