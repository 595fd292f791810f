//! API endpoint for user logout and session termination.

use rocket::serde::json::{Json, Value, json};
use rocket::{
    Route,
    http::{Cookie, CookieJar},
};

use crate::DbConn;
use crate::orm::login::SESSION_COOKIE;
use crate::orm::logout::revoke_session;

/// Logout endpoint.
///
/// - **URL:** `/api/1/logout`
/// - **Method:** `POST`
/// - **Authentication:** None required
///
/// Revokes the session named by the cookie, if any, and removes the cookie.
/// Always answers 200:
/// ```json
/// { "message": "Logout successful", "status": "ok" }
/// ```
#[post("/1/logout")]
pub async fn logout(db: DbConn, cookies: &CookieJar<'_>) -> Json<Value> {
    let cookie_value = cookies.get(SESSION_COOKIE).map(|c| c.value().to_string());

    if let Some(session_id) = cookie_value {
        if let Err(e) = revoke_session(&db, &session_id).await {
            warn!("Failed to revoke session on logout: {:?}", e);
        }
        cookies.remove(Cookie::from(SESSION_COOKIE));
    }

    Json(json!({
        "message": "Logout successful",
        "status": "ok"
    }))
}

pub fn routes() -> Vec<Route> {
    routes![logout]
}
