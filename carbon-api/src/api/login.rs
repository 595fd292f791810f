//! API endpoints for user login and authentication.
//!
//! Handles credential checks, session cookies, and the "who am I" probe the
//! front end uses to decide where a visitor lands.

use rocket::response;
use rocket::serde::{Deserialize, Serialize};
use rocket::{Route, http::CookieJar, serde::json::Json};
use ts_rs::TS;

use crate::DbConn;
use crate::api::ErrorResponse;
use crate::models::User;
use crate::orm::login::process_login;
use crate::session_guards::AuthenticatedUser;

/// Landing page for administrators.
pub const SUPERUSER_LANDING: &str = "/dashboard";
/// Landing page for everyone else: pick an employee, then view their dashboard.
pub const USER_LANDING: &str = "/my-dashboard";

/// Login success response structure containing user information.
#[derive(Serialize, Deserialize, Debug, TS)]
#[ts(export)]
pub struct LoginSuccessResponse {
    pub user_id: i32,
    pub email: String,
    pub is_superuser: bool,
    /// Front-end path to go to after login.
    pub landing: String,
}

impl From<User> for LoginSuccessResponse {
    fn from(user: User) -> Self {
        let landing = if user.is_superuser {
            SUPERUSER_LANDING
        } else {
            USER_LANDING
        };
        LoginSuccessResponse {
            user_id: user.id,
            email: user.email,
            is_superuser: user.is_superuser,
            landing: landing.to_string(),
        }
    }
}

/// Login request structure containing user credentials.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login endpoint that authenticates users and creates sessions.
///
/// - **URL:** `/api/1/login`
/// - **Method:** `POST`
/// - **Authentication:** None required
///
/// # Request Format
///
/// ```json
/// {
///   "email": "user@example.com",
///   "password": "userpassword"
/// }
/// ```
///
/// # Response
///
/// **Success (HTTP 200 OK):** sets the `session` cookie (HTTP-only,
/// SameSite=Lax) and returns
/// ```json
/// { "user_id": 1, "email": "user@example.com", "is_superuser": false, "landing": "/my-dashboard" }
/// ```
///
/// **Failure (HTTP 400 or 401):**
/// ```json
/// { "error": "Invalid credentials" }
/// ```
#[post("/1/login", data = "<login>")]
pub async fn login(
    db: DbConn,
    cookies: &CookieJar<'_>,
    login: Json<LoginRequest>,
) -> Result<Json<LoginSuccessResponse>, response::status::Custom<Json<ErrorResponse>>> {
    match process_login(&db, cookies, &login).await {
        Ok((_status, user)) => {
            info!("User '{}' logged in", user.email);
            Ok(Json(LoginSuccessResponse::from(user)))
        }
        Err(status) => {
            let err_json = Json(ErrorResponse {
                error: "Invalid credentials".to_string(),
            });
            Err(response::status::Custom(status, err_json))
        }
    }
}

/// Hello (Authentication Check) endpoint.
///
/// - **URL:** `/api/1/hello`
/// - **Method:** `GET`
/// - **Authentication:** Required
///
/// Returns the same body as a successful login, or 401 when the session is
/// missing, revoked or expired.
#[get("/1/hello")]
pub async fn secure_hello(auth_user: AuthenticatedUser) -> Json<LoginSuccessResponse> {
    Json(LoginSuccessResponse::from(auth_user.user))
}

pub fn routes() -> Vec<Route> {
    routes![login, secure_hello]
}
