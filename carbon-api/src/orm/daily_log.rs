//! Persistence for daily activity logs.
//!
//! The one-way commute distance is resolved when a log is written, from the
//! owning employee's home distance or the start location, and stored with
//! the row. Later changes to the employee leave existing logs alone.

use chrono::NaiveDate;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::emissions::{DistanceEstimator, PlaceholderDistance, derive_commute_distance};
use crate::models::{
    DEFAULT_HOURS_WORKED, DailyLog, DailyLogInput, Employee, NewDailyLog, UpdateDailyLogRequest,
};
use crate::report::DateRange;

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    last_insert_rowid: i64,
}

/// Today's date in the server's local time zone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Inserts a log dated today for the employee named in `input`.
///
/// Returns `NotFound` if the employee does not exist.
pub fn insert_daily_log(
    conn: &mut SqliteConnection,
    input: &DailyLogInput,
) -> Result<DailyLog, diesel::result::Error> {
    insert_daily_log_on(conn, input, today())
}

/// Inserts a log with an explicit date. Used by the seeder and by tests.
pub fn insert_daily_log_on(
    conn: &mut SqliteConnection,
    input: &DailyLogInput,
    log_date: NaiveDate,
) -> Result<DailyLog, diesel::result::Error> {
    insert_daily_log_with(conn, &PlaceholderDistance, input, log_date)
}

/// Inserts a log, resolving the commute distance with `estimator`.
pub fn insert_daily_log_with<E: DistanceEstimator>(
    conn: &mut SqliteConnection,
    estimator: &E,
    input: &DailyLogInput,
    log_date: NaiveDate,
) -> Result<DailyLog, diesel::result::Error> {
    use crate::schema::daily_logs::dsl::*;

    let employee = find_employee(conn, input.employee_id)?;

    let home = input.is_home_commute.unwrap_or(true);
    let location = input.start_location();
    let distance = derive_commute_distance(
        estimator,
        home,
        employee.home_commute_distance_km,
        location.as_deref(),
        input.commute_distance_km.unwrap_or(0.0),
    );

    let new_log = NewDailyLog {
        employee_id: employee.id,
        date: log_date,
        hours_worked: input.hours_worked.unwrap_or(DEFAULT_HOURS_WORKED),
        is_home_commute: home,
        start_location: location,
        commute_mode: input.commute_mode_code(),
        commute_distance_km: distance,
        vcpu_hours: input.vcpu_hours.unwrap_or(0.0),
        storage_gb: input.storage_gb.unwrap_or(0.0),
    };

    diesel::insert_into(daily_logs)
        .values(&new_log)
        .execute(conn)?;

    let last_id = diesel::sql_query("SELECT last_insert_rowid() as last_insert_rowid")
        .get_result::<LastInsertRowId>(conn)?
        .last_insert_rowid;

    daily_logs
        .filter(id.eq(last_id as i32))
        .select(DailyLog::as_select())
        .first(conn)
}

fn find_employee(
    conn: &mut SqliteConnection,
    emp_id: i32,
) -> Result<Employee, diesel::result::Error> {
    use crate::schema::employees;
    employees::table
        .filter(employees::id.eq(emp_id))
        .select(Employee::as_select())
        .first(conn)
}

pub fn get_daily_log(
    conn: &mut SqliteConnection,
    log_id: i32,
) -> Result<Option<DailyLog>, diesel::result::Error> {
    use crate::schema::daily_logs::dsl::*;
    daily_logs
        .filter(id.eq(log_id))
        .select(DailyLog::as_select())
        .first(conn)
        .optional()
}

/// Updates the supplied fields of a log.
///
/// The commute distance is resolved again with the owning employee's
/// current home distance, the same way it is on insert. Returns `NotFound`
/// if the log does not exist.
pub fn update_daily_log(
    conn: &mut SqliteConnection,
    log_id: i32,
    request: UpdateDailyLogRequest,
) -> Result<DailyLog, diesel::result::Error> {
    update_daily_log_with(conn, &PlaceholderDistance, log_id, request)
}

/// Updates a log, resolving the commute distance with `estimator`.
pub fn update_daily_log_with<E: DistanceEstimator>(
    conn: &mut SqliteConnection,
    estimator: &E,
    log_id: i32,
    request: UpdateDailyLogRequest,
) -> Result<DailyLog, diesel::result::Error> {
    use crate::schema::daily_logs::dsl::*;

    let current = daily_logs
        .filter(id.eq(log_id))
        .select(DailyLog::as_select())
        .first(conn)?;
    let employee = find_employee(conn, current.employee_id)?;

    let home = request.is_home_commute.unwrap_or(current.is_home_commute);
    let location = match request.start_location {
        Some(loc) if loc.is_empty() => None,
        Some(loc) => Some(loc),
        None => current.start_location,
    };
    let supplied = request
        .commute_distance_km
        .unwrap_or(current.commute_distance_km);
    let distance = derive_commute_distance(
        estimator,
        home,
        employee.home_commute_distance_km,
        location.as_deref(),
        supplied,
    );

    diesel::update(daily_logs.filter(id.eq(log_id)))
        .set((
            hours_worked.eq(request.hours_worked.unwrap_or(current.hours_worked)),
            is_home_commute.eq(home),
            start_location.eq(location),
            commute_mode.eq(request.commute_mode.unwrap_or(current.commute_mode)),
            commute_distance_km.eq(distance),
            vcpu_hours.eq(request.vcpu_hours.unwrap_or(current.vcpu_hours)),
            storage_gb.eq(request.storage_gb.unwrap_or(current.storage_gb)),
        ))
        .execute(conn)?;

    daily_logs
        .filter(id.eq(log_id))
        .select(DailyLog::as_select())
        .first(conn)
}

/// Returns an employee's logs inside `range`, newest first.
pub fn get_logs_for_employee(
    conn: &mut SqliteConnection,
    emp_id: i32,
    range: DateRange,
) -> Result<Vec<DailyLog>, diesel::result::Error> {
    use crate::schema::daily_logs::dsl::*;

    let mut query = daily_logs
        .filter(employee_id.eq(emp_id))
        .select(DailyLog::as_select())
        .into_boxed();
    if let Some(since) = range.since {
        query = query.filter(date.ge(since));
    }
    if let Some(until) = range.until {
        query = query.filter(date.le(until));
    }
    query.order((date.desc(), id.desc())).load(conn)
}

/// Returns every log, newest first.
pub fn get_all_logs(conn: &mut SqliteConnection) -> Result<Vec<DailyLog>, diesel::result::Error> {
    use crate::schema::daily_logs::dsl::*;
    daily_logs
        .order((date.desc(), id.desc()))
        .select(DailyLog::as_select())
        .load(conn)
}

/// Returns the `limit` most recent logs together with their employee.
pub fn get_recent_logs_with_employee(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<(DailyLog, Employee)>, diesel::result::Error> {
    use crate::schema::{daily_logs, employees};
    daily_logs::table
        .inner_join(employees::table)
        .order((daily_logs::date.desc(), daily_logs::id.desc()))
        .limit(limit)
        .select((DailyLog::as_select(), Employee::as_select()))
        .load(conn)
}

pub fn delete_daily_log(
    conn: &mut SqliteConnection,
    log_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::daily_logs::dsl::*;
    let rows_affected = diesel::delete(daily_logs.filter(id.eq(log_id))).execute(conn)?;
    Ok(rows_affected > 0)
}

/// Removes every log. Returns the number of rows deleted.
pub fn delete_all_daily_logs(conn: &mut SqliteConnection) -> Result<usize, diesel::result::Error> {
    use crate::schema::daily_logs::dsl::*;
    diesel::delete(daily_logs).execute(conn)
}
