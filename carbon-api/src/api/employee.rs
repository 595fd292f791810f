//! API endpoints for employees and their per-employee views.
//!
//! Reads are open so the selection page can work before login; changes to
//! the employee list need a superuser.

use chrono::NaiveDate;
use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, api_error, db_error};
use crate::logged_json::LoggedJson;
use crate::models::{DailyLogWithEmissions, Employee, EmployeeInput, UpdateEmployeeRequest};
use crate::orm::DbConn;
use crate::orm::daily_log::get_logs_for_employee;
use crate::orm::employee::{
    delete_employee, get_all_employees, get_employee, insert_employee, update_employee,
};
use crate::report::{DateRange, EmployeeReport};
use crate::session_guards::SuperUser;

/// Parses an optional `YYYY-MM-DD` query value.
fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                api_error(
                    Status::BadRequest,
                    format!("Invalid '{}' date '{}', expected YYYY-MM-DD", field, raw),
                )
            }),
    }
}

async fn load_employee(db: &DbConn, employee_id: i32) -> Result<Employee, ApiError> {
    db.run(move |conn| get_employee(conn, employee_id))
        .await
        .map_err(|e| db_error("loading employee", e))?
        .ok_or_else(|| api_error(Status::NotFound, "Employee not found"))
}

/// List Employees endpoint.
///
/// - **URL:** `/api/1/Employees`
/// - **Method:** `GET`
/// - **Authentication:** None required
///
/// Returns every employee ordered by id.
#[get("/1/Employees")]
pub async fn list_employees(db: DbConn) -> Result<Json<Vec<Employee>>, ApiError> {
    db.run(get_all_employees)
        .await
        .map(Json)
        .map_err(|e| db_error("listing employees", e))
}

/// Get Employee endpoint.
///
/// - **URL:** `/api/1/Employees/<employee_id>`
/// - **Method:** `GET`
/// - **Authentication:** None required
///
/// 404 if the id is unknown.
#[get("/1/Employees/<employee_id>")]
pub async fn get_employee_endpoint(
    db: DbConn,
    employee_id: i32,
) -> Result<Json<Employee>, ApiError> {
    load_employee(&db, employee_id).await.map(Json)
}

/// Create Employee endpoint.
///
/// - **URL:** `/api/1/Employees`
/// - **Method:** `POST`
/// - **Authentication:** Superuser
///
/// ```json
/// { "name": "Aarav Patel", "home_address": "Locality 3, Bengaluru", "home_commute_distance_km": 12.5 }
/// ```
///
/// Address and distance default to `"Home"` and `10.0`. Answers 201 with the
/// stored employee, or 400 when the name is blank.
#[post("/1/Employees", data = "<new_employee>")]
pub async fn create_employee(
    db: DbConn,
    new_employee: LoggedJson<EmployeeInput>,
    _admin: SuperUser,
) -> Result<status::Created<Json<Employee>>, ApiError> {
    let input = new_employee.into_inner();
    if input.name.trim().is_empty() {
        return Err(api_error(Status::BadRequest, "Employee name must not be empty"));
    }

    let employee = db
        .run(move |conn| insert_employee(conn, input.into()))
        .await
        .map_err(|e| db_error("creating employee", e))?;

    info!("Created employee {} '{}'", employee.id, employee.name);
    let location = format!("/api/1/Employees/{}", employee.id);
    Ok(status::Created::new(location).body(Json(employee)))
}

/// Update Employee endpoint.
///
/// - **URL:** `/api/1/Employees/<employee_id>`
/// - **Method:** `PUT`
/// - **Authentication:** Superuser
///
/// Only the supplied fields change. Existing logs keep the distance they
/// were recorded with.
#[put("/1/Employees/<employee_id>", data = "<request>")]
pub async fn update_employee_endpoint(
    db: DbConn,
    employee_id: i32,
    request: LoggedJson<UpdateEmployeeRequest>,
    _admin: SuperUser,
) -> Result<Json<Employee>, ApiError> {
    let request = request.into_inner();
    if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(api_error(Status::BadRequest, "Employee name must not be empty"));
    }

    db.run(move |conn| update_employee(conn, employee_id, request))
        .await
        .map(Json)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => api_error(Status::NotFound, "Employee not found"),
            other => db_error("updating employee", other),
        })
}

/// Delete Employee endpoint.
///
/// - **URL:** `/api/1/Employees/<employee_id>`
/// - **Method:** `DELETE`
/// - **Authentication:** Superuser
///
/// Removes the employee and every log they own. 204 on success, 404 if the
/// id is unknown.
#[delete("/1/Employees/<employee_id>")]
pub async fn delete_employee_endpoint(
    db: DbConn,
    employee_id: i32,
    _admin: SuperUser,
) -> Result<Status, ApiError> {
    let deleted = db
        .run(move |conn| delete_employee(conn, employee_id))
        .await
        .map_err(|e| db_error("deleting employee", e))?;

    if deleted {
        info!("Deleted employee {}", employee_id);
        Ok(Status::NoContent)
    } else {
        Err(api_error(Status::NotFound, "Employee not found"))
    }
}

/// List an employee's logs, newest first, with their emission figures.
///
/// - **URL:** `/api/1/Employees/<employee_id>/DailyLogs`
/// - **Method:** `GET`
/// - **Authentication:** None required
#[get("/1/Employees/<employee_id>/DailyLogs")]
pub async fn list_employee_logs(
    db: DbConn,
    employee_id: i32,
) -> Result<Json<Vec<DailyLogWithEmissions>>, ApiError> {
    load_employee(&db, employee_id).await?;

    let logs = db
        .run(move |conn| get_logs_for_employee(conn, employee_id, DateRange::all_time()))
        .await
        .map_err(|e| db_error("loading logs", e))?;

    Ok(Json(logs.into_iter().map(DailyLogWithEmissions::from).collect()))
}

/// Employee Dashboard endpoint.
///
/// - **URL:** `/api/1/Employees/<employee_id>/Dashboard?since=YYYY-MM-DD&until=YYYY-MM-DD`
/// - **Method:** `GET`
/// - **Authentication:** None required
///
/// Both bounds are inclusive and optional; without them the report covers
/// all time. 404 for an unknown employee, 400 for a malformed date.
#[get("/1/Employees/<employee_id>/Dashboard?<since>&<until>")]
pub async fn employee_dashboard(
    db: DbConn,
    employee_id: i32,
    since: Option<&str>,
    until: Option<&str>,
) -> Result<Json<EmployeeReport>, ApiError> {
    let range = DateRange {
        since: parse_date("since", since)?,
        until: parse_date("until", until)?,
    };
    let employee = load_employee(&db, employee_id).await?;

    let logs = db
        .run(move |conn| get_logs_for_employee(conn, employee_id, range))
        .await
        .map_err(|e| db_error("loading logs", e))?;

    Ok(Json(EmployeeReport::new(employee, range, logs)))
}

pub fn routes() -> Vec<Route> {
    routes![
        list_employees,
        get_employee_endpoint,
        create_employee,
        update_employee_endpoint,
        delete_employee_endpoint,
        list_employee_logs,
        employee_dashboard,
    ]
}
