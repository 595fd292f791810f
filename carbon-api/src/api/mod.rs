pub mod daily_log;
pub mod dashboard;
pub mod employee;
pub mod login;
pub mod logout;
pub mod status;

use rocket::Route;
use rocket::http::Status;
use rocket::response;
use rocket::serde::json::Json;
use serde::Serialize;
use ts_rs::TS;

/// Error body returned by every handler that fails with a message.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = response::status::Custom<Json<ErrorResponse>>;

pub(crate) fn api_error(status: Status, message: impl Into<String>) -> ApiError {
    response::status::Custom(
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Logs a database failure and turns it into a 500 with a generic message.
pub(crate) fn db_error(context: &str, e: diesel::result::Error) -> ApiError {
    error!("Database error while {}: {:?}", context, e);
    api_error(
        Status::InternalServerError,
        format!("Database error while {}", context),
    )
}

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(daily_log::routes());
    routes.extend(dashboard::routes());
    routes.extend(employee::routes());
    routes.extend(login::routes());
    routes.extend(logout::routes());
    routes.extend(status::routes());
    routes
}
