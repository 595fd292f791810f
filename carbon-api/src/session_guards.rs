//! Session-based authentication and authorization guards for Rocket routes.
//!
//! Every protected route takes one of these guards as a parameter:
//!
//! ```rust,ignore
//! use carbon_api::session_guards::{AuthenticatedUser, SuperUser};
//!
//! #[get("/profile")]
//! fn profile(auth: AuthenticatedUser) -> String {
//!     format!("Welcome, {}!", auth.user.email)
//! }
//!
//! #[get("/settings")]
//! fn settings(admin: SuperUser) -> String {
//!     format!("Settings for {}", admin.user.email)
//! }
//! ```

use chrono::Utc;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use crate::DbConn;
use crate::models::{Session, User};
use crate::orm::login::SESSION_COOKIE;
use crate::schema::{sessions, users};

/// A request guard for routes that require a logged-in user.
///
/// The guard reads the session cookie, finds a matching session that is
/// neither revoked nor expired, and loads its user.
///
/// - `Outcome::Success(AuthenticatedUser)` if authentication succeeds
/// - `Outcome::Error(Status::Unauthorized)` if the cookie, session or user is missing
/// - `Outcome::Error(Status::InternalServerError)` if no database connection is available
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user: User,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let cookies = request.cookies();
        let db = match request.guard::<DbConn>().await {
            Outcome::Success(db) => db,
            _ => return Outcome::Error((Status::InternalServerError, ())),
        };

        let session_cookie = match cookies.get(SESSION_COOKIE) {
            Some(cookie) => cookie,
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        let session_id = session_cookie.value().to_string();

        let session_result = db
            .run(move |conn| {
                sessions::table
                    .filter(sessions::id.eq(&session_id))
                    .filter(sessions::revoked.eq(false))
                    .filter(
                        sessions::expires_at
                            .is_null()
                            .or(sessions::expires_at.gt(Utc::now().naive_utc())),
                    )
                    .first::<Session>(conn)
                    .optional()
            })
            .await;

        let session = match session_result {
            Ok(Some(sess)) => sess,
            Ok(None) => return Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                error!("Database error finding session: {:?}", e);
                return Outcome::Error((Status::Unauthorized, ()));
            }
        };

        let user_result = db
            .run(move |conn| {
                users::table
                    .filter(users::id.eq(session.user_id))
                    .first::<User>(conn)
                    .optional()
            })
            .await;

        match user_result {
            Ok(Some(user)) => Outcome::Success(AuthenticatedUser { user }),
            Ok(None) => Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                error!("Database error finding user: {:?}", e);
                Outcome::Error((Status::Unauthorized, ()))
            }
        }
    }
}

/// A request guard that additionally requires administrator access.
///
/// Authenticated users without the superuser flag get `403 Forbidden`.
#[derive(Debug)]
pub struct SuperUser {
    pub user: User,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SuperUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let auth_user = match AuthenticatedUser::from_request(request).await {
            Outcome::Success(user) => user,
            Outcome::Error(e) => return Outcome::Error(e),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        if auth_user.user.is_superuser {
            Outcome::Success(SuperUser {
                user: auth_user.user,
            })
        } else {
            Outcome::Error((Status::Forbidden, ()))
        }
    }
}
