//! API endpoints for daily activity logs.
//!
//! The same path accepts JSON from API clients and url-encoded posts from
//! the HTML intake form; Rocket picks the handler by content type. Reading a
//! single log is open, correcting or removing one needs a superuser.

use rocket::Route;
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::{Redirect, status};
use rocket::serde::json::Json;

use crate::api::{ApiError, api_error, db_error};
use crate::logged_json::LoggedJson;
use crate::models::{DailyLogInput, DailyLogWithEmissions, UpdateDailyLogRequest};
use crate::orm::DbConn;
use crate::orm::daily_log::{delete_daily_log, get_daily_log, insert_daily_log, update_daily_log};
use crate::session_guards::SuperUser;

/// The HTML intake form.
///
/// Every field except `employee` is optional; values that are missing or
/// fail to parse fall back to the defaults. `is_home_commute` is a
/// checkbox, so leaving it out means "not from home".
#[derive(Debug, FromForm)]
pub struct DailyLogForm {
    pub employee: i32,
    pub hours_worked: Option<f64>,
    pub is_home_commute: Option<bool>,
    pub start_location: Option<String>,
    pub commute_mode: Option<String>,
    pub vcpu_hours: Option<f64>,
    pub storage_gb: Option<f64>,
}

impl From<DailyLogForm> for DailyLogInput {
    fn from(form: DailyLogForm) -> Self {
        DailyLogInput {
            employee_id: form.employee,
            hours_worked: form.hours_worked,
            is_home_commute: Some(form.is_home_commute.unwrap_or(false)),
            start_location: form.start_location,
            commute_mode: form.commute_mode.filter(|m| !m.is_empty()),
            commute_distance_km: None,
            vcpu_hours: form.vcpu_hours,
            storage_gb: form.storage_gb,
        }
    }
}

async fn store_log(db: &DbConn, input: DailyLogInput) -> Result<DailyLogWithEmissions, ApiError> {
    let employee_id = input.employee_id;
    db.run(move |conn| insert_daily_log(conn, &input))
        .await
        .map(DailyLogWithEmissions::from)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                warn!("Daily log rejected: employee {} not found", employee_id);
                api_error(Status::NotFound, "Employee not found")
            }
            other => db_error("saving daily log", other),
        })
}

/// Create Daily Log endpoint (JSON).
///
/// - **URL:** `/api/1/DailyLogs`
/// - **Method:** `POST`
/// - **Authentication:** None required
///
/// ```json
/// {
///   "employee_id": 1,
///   "hours_worked": 8.5,
///   "is_home_commute": false,
///   "start_location": "Client Site",
///   "commute_mode": "CAR",
///   "vcpu_hours": 4,
///   "storage_gb": 10
/// }
/// ```
///
/// The log is dated today. The commute distance is resolved before storing:
/// home commutes take the employee's home distance, otherwise a start
/// location with no distance gets an estimate. Answers 201 with the stored
/// log and its emissions, 404 for an unknown employee and 422 for a body
/// that does not parse.
#[post("/1/DailyLogs", format = "json", data = "<new_log>")]
pub async fn create_daily_log(
    db: DbConn,
    new_log: LoggedJson<DailyLogInput>,
) -> Result<status::Created<Json<DailyLogWithEmissions>>, ApiError> {
    let stored = store_log(&db, new_log.into_inner()).await?;
    info!(
        "Recorded daily log {} for employee {}",
        stored.log.id, stored.log.employee_id
    );
    let location = format!("/api/1/Employees/{}/DailyLogs", stored.log.employee_id);
    Ok(status::Created::new(location).body(Json(stored)))
}

/// Create Daily Log endpoint (HTML form).
///
/// - **URL:** `/api/1/DailyLogs`
/// - **Method:** `POST` (`application/x-www-form-urlencoded`)
/// - **Authentication:** None required
///
/// On success redirects (303) to the employee's dashboard.
#[post("/1/DailyLogs", format = "form", data = "<form>", rank = 2)]
pub async fn submit_daily_log_form(
    db: DbConn,
    form: Form<DailyLogForm>,
) -> Result<Redirect, ApiError> {
    let stored = store_log(&db, form.into_inner().into()).await?;
    info!(
        "Recorded daily log {} for employee {} from form",
        stored.log.id, stored.log.employee_id
    );
    Ok(Redirect::to(format!(
        "/api/1/Employees/{}/Dashboard",
        stored.log.employee_id
    )))
}

/// Get Daily Log endpoint.
///
/// - **URL:** `/api/1/DailyLogs/<log_id>`
/// - **Method:** `GET`
/// - **Authentication:** None required
///
/// 404 if the id is unknown.
#[get("/1/DailyLogs/<log_id>")]
pub async fn get_daily_log_endpoint(
    db: DbConn,
    log_id: i32,
) -> Result<Json<DailyLogWithEmissions>, ApiError> {
    db.run(move |conn| get_daily_log(conn, log_id))
        .await
        .map_err(|e| db_error("loading daily log", e))?
        .map(|log| Json(DailyLogWithEmissions::from(log)))
        .ok_or_else(|| api_error(Status::NotFound, "Daily log not found"))
}

/// Update Daily Log endpoint.
///
/// - **URL:** `/api/1/DailyLogs/<log_id>`
/// - **Method:** `PUT`
/// - **Authentication:** Superuser
///
/// ```json
/// { "is_home_commute": false, "start_location": "Client Site", "commute_mode": "BUS" }
/// ```
///
/// Only the supplied fields change; the date and owner stay fixed. The
/// commute distance is resolved again exactly as on creation, so a home
/// commute picks up the employee's current home distance.
#[put("/1/DailyLogs/<log_id>", data = "<request>")]
pub async fn update_daily_log_endpoint(
    db: DbConn,
    log_id: i32,
    request: LoggedJson<UpdateDailyLogRequest>,
    _admin: SuperUser,
) -> Result<Json<DailyLogWithEmissions>, ApiError> {
    let request = request.into_inner();
    let updated = db
        .run(move |conn| update_daily_log(conn, log_id, request))
        .await
        .map_err(|e| match e {
            diesel::result::Error::NotFound => api_error(Status::NotFound, "Daily log not found"),
            other => db_error("updating daily log", other),
        })?;

    info!("Updated daily log {}", updated.id);
    Ok(Json(DailyLogWithEmissions::from(updated)))
}

/// Delete Daily Log endpoint.
///
/// - **URL:** `/api/1/DailyLogs/<log_id>`
/// - **Method:** `DELETE`
/// - **Authentication:** Superuser
///
/// 204 on success, 404 if the id is unknown.
#[delete("/1/DailyLogs/<log_id>")]
pub async fn delete_daily_log_endpoint(
    db: DbConn,
    log_id: i32,
    _admin: SuperUser,
) -> Result<Status, ApiError> {
    let deleted = db
        .run(move |conn| delete_daily_log(conn, log_id))
        .await
        .map_err(|e| db_error("deleting daily log", e))?;

    if deleted {
        info!("Deleted daily log {}", log_id);
        Ok(Status::NoContent)
    } else {
        Err(api_error(Status::NotFound, "Daily log not found"))
    }
}

pub fn routes() -> Vec<Route> {
    routes![
        create_daily_log,
        submit_daily_log_form,
        get_daily_log_endpoint,
        update_daily_log_endpoint,
        delete_daily_log_endpoint
    ]
}
