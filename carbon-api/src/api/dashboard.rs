//! Company dashboard and settings endpoints. Superusers only.

use rocket::form::Form;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{Route, State};

use crate::api::{ApiError, db_error};
use crate::logged_json::LoggedJson;
use crate::models::{CompanyConfig, CompanyConfigDefaults, CompanyConfigUpdate};
use crate::orm::DbConn;
use crate::orm::company_config::{get_or_create_config, update_config};
use crate::orm::daily_log::{get_all_logs, get_recent_logs_with_employee};
use crate::orm::employee::count_employees;
use crate::report::{COMPANY_RECENT_LOGS, CompanyReport};
use crate::session_guards::SuperUser;

/// Company Dashboard endpoint.
///
/// - **URL:** `/api/1/Dashboard`
/// - **Method:** `GET`
/// - **Authentication:** Superuser
///
/// Returns the company-wide report: office, cloud, commute and digital
/// emissions, the per-hour carbon cost, the ten latest logs and the
/// current settings.
#[get("/1/Dashboard")]
pub async fn company_dashboard(
    db: DbConn,
    defaults: &State<CompanyConfigDefaults>,
    _admin: SuperUser,
) -> Result<Json<CompanyReport>, ApiError> {
    let defaults = *defaults.inner();
    db.run(move |conn| {
        let config = get_or_create_config(conn, &defaults)?;
        let logs = get_all_logs(conn)?;
        let recent = get_recent_logs_with_employee(conn, COMPANY_RECENT_LOGS)?;
        let employee_count = count_employees(conn)?;
        Ok::<_, diesel::result::Error>(CompanyReport::new(config, &logs, recent, employee_count))
    })
    .await
    .map(Json)
    .map_err(|e| db_error("building company report", e))
}

/// Read Config endpoint.
///
/// - **URL:** `/api/1/Config`
/// - **Method:** `GET`
/// - **Authentication:** Superuser
#[get("/1/Config")]
pub async fn get_config_endpoint(
    db: DbConn,
    defaults: &State<CompanyConfigDefaults>,
    _admin: SuperUser,
) -> Result<Json<CompanyConfig>, ApiError> {
    let defaults = *defaults.inner();
    db.run(move |conn| get_or_create_config(conn, &defaults))
        .await
        .map(Json)
        .map_err(|e| db_error("loading config", e))
}

async fn apply_update(
    db: &DbConn,
    defaults: CompanyConfigDefaults,
    update: CompanyConfigUpdate,
) -> Result<CompanyConfig, ApiError> {
    let config = db
        .run(move |conn| update_config(conn, &defaults, &update))
        .await
        .map_err(|e| db_error("updating config", e))?;
    info!(
        "Company config updated: electricity {} kWh, grid intensity {}, cloud {} kWh, {} servers",
        config.total_monthly_electricity_bill_kwh,
        config.grid_intensity,
        config.total_cloud_usage_kwh,
        config.server_count
    );
    Ok(config)
}

/// Update Config endpoint (JSON).
///
/// - **URL:** `/api/1/Config`
/// - **Method:** `PUT`
/// - **Authentication:** Superuser
///
/// ```json
/// { "grid_intensity": 0.71, "server_count": 12 }
/// ```
///
/// Fields left out keep their value. No range checks are applied.
#[put("/1/Config", format = "json", data = "<update>")]
pub async fn update_config_endpoint(
    db: DbConn,
    defaults: &State<CompanyConfigDefaults>,
    update: LoggedJson<CompanyConfigUpdate>,
    _admin: SuperUser,
) -> Result<Json<CompanyConfig>, ApiError> {
    apply_update(&db, *defaults.inner(), update.into_inner())
        .await
        .map(Json)
}

/// Update Config endpoint (HTML form).
///
/// - **URL:** `/api/1/Config`
/// - **Method:** `POST` (`application/x-www-form-urlencoded`)
/// - **Authentication:** Superuser
///
/// Missing or malformed fields keep their value. Redirects (303) to the
/// company dashboard.
#[post("/1/Config", format = "form", data = "<update>")]
pub async fn submit_config_form(
    db: DbConn,
    defaults: &State<CompanyConfigDefaults>,
    update: Form<CompanyConfigUpdate>,
    _admin: SuperUser,
) -> Result<Redirect, ApiError> {
    apply_update(&db, *defaults.inner(), update.into_inner()).await?;
    Ok(Redirect::to("/api/1/Dashboard"))
}

pub fn routes() -> Vec<Route> {
    routes![
        company_dashboard,
        get_config_endpoint,
        update_config_endpoint,
        submit_config_form,
    ]
}
