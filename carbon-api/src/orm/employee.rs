use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use crate::models::{Employee, NewEmployee, UpdateEmployeeRequest};

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    last_insert_rowid: i64,
}

/// Inserts a new employee and returns the stored row.
pub fn insert_employee(
    conn: &mut SqliteConnection,
    new_employee: NewEmployee,
) -> Result<Employee, diesel::result::Error> {
    use crate::schema::employees::dsl::*;

    diesel::insert_into(employees)
        .values(&new_employee)
        .execute(conn)?;

    let last_id = diesel::sql_query("SELECT last_insert_rowid() as last_insert_rowid")
        .get_result::<LastInsertRowId>(conn)?
        .last_insert_rowid;

    employees
        .filter(id.eq(last_id as i32))
        .select(Employee::as_select())
        .first(conn)
}

/// Try to find an employee by id.
/// Returns Ok(Some(Employee)) if found, Ok(None) if not, Err on DB error.
pub fn get_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<Option<Employee>, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    employees
        .filter(id.eq(employee_id))
        .select(Employee::as_select())
        .first(conn)
        .optional()
}

/// Try to find an employee by exact name. The first match by id wins.
pub fn get_employee_by_name(
    conn: &mut SqliteConnection,
    employee_name: &str,
) -> Result<Option<Employee>, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    employees
        .filter(name.eq(employee_name))
        .order(id.asc())
        .select(Employee::as_select())
        .first(conn)
        .optional()
}

/// Returns all employees in ascending order by id.
pub fn get_all_employees(
    conn: &mut SqliteConnection,
) -> Result<Vec<Employee>, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    employees
        .order(id.asc())
        .select(Employee::as_select())
        .load(conn)
}

pub fn count_employees(conn: &mut SqliteConnection) -> Result<i64, diesel::result::Error> {
    use crate::schema::employees::dsl::*;
    employees.count().get_result(conn)
}

/// Updates the supplied fields of an employee.
///
/// Existing logs keep the distance they were written with; only logs
/// written afterwards see a new home distance.
pub fn update_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
    request: UpdateEmployeeRequest,
) -> Result<Employee, diesel::result::Error> {
    use crate::schema::employees::dsl::*;

    // First, get the current employee to preserve existing values
    let current = employees
        .filter(id.eq(employee_id))
        .select(Employee::as_select())
        .first(conn)?;

    diesel::update(employees.filter(id.eq(employee_id)))
        .set((
            name.eq(request.name.unwrap_or(current.name)),
            home_address.eq(request.home_address.unwrap_or(current.home_address)),
            home_commute_distance_km.eq(request
                .home_commute_distance_km
                .unwrap_or(current.home_commute_distance_km)),
        ))
        .execute(conn)?;

    employees
        .filter(id.eq(employee_id))
        .select(Employee::as_select())
        .first(conn)
}

/// Deletes an employee together with every log it owns.
/// Returns Ok(true) if the employee was found and deleted, Ok(false) if not.
pub fn delete_employee(
    conn: &mut SqliteConnection,
    employee_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::{daily_logs, employees};

    // The schema cascades too, but foreign keys are only enforced on
    // connections that ran the pragma.
    conn.transaction(|conn| {
        diesel::delete(daily_logs::table.filter(daily_logs::employee_id.eq(employee_id)))
            .execute(conn)?;
        let rows_affected =
            diesel::delete(employees::table.filter(employees::id.eq(employee_id))).execute(conn)?;
        Ok(rows_affected > 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeInput;
    use crate::orm::testing::setup_test_db;

    fn new_employee(emp_name: &str, distance: f64) -> NewEmployee {
        NewEmployee {
            name: emp_name.to_string(),
            home_address: "Locality 4, Bengaluru".to_string(),
            home_commute_distance_km: distance,
        }
    }

    #[test]
    fn test_insert_employee() {
        let mut conn = setup_test_db();
        let emp = insert_employee(&mut conn, new_employee("Diya Sharma", 12.5)).unwrap();
        assert!(emp.id > 0);
        assert_eq!(emp.name, "Diya Sharma");
        assert_eq!(emp.home_commute_distance_km, 12.5);

        let found = get_employee(&mut conn, emp.id).unwrap().expect("employee should exist");
        assert_eq!(found, emp);
    }

    #[test]
    fn test_input_defaults() {
        let mut conn = setup_test_db();
        let input = EmployeeInput {
            name: "Rohan Gupta".to_string(),
            home_address: None,
            home_commute_distance_km: None,
        };
        let emp = insert_employee(&mut conn, input.into()).unwrap();
        assert_eq!(emp.home_address, "Home");
        assert_eq!(emp.home_commute_distance_km, 10.0);
    }

    #[test]
    fn test_get_missing_employee() {
        let mut conn = setup_test_db();
        assert!(get_employee(&mut conn, 4242).unwrap().is_none());
        assert!(get_employee_by_name(&mut conn, "Nobody").unwrap().is_none());
    }

    #[test]
    fn test_list_and_count() {
        let mut conn = setup_test_db();
        insert_employee(&mut conn, new_employee("Aarav Patel", 8.0)).unwrap();
        insert_employee(&mut conn, new_employee("Ananya Singh", 21.0)).unwrap();

        let all = get_all_employees(&mut conn).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id < all[1].id);
        assert_eq!(count_employees(&mut conn).unwrap(), 2);
    }

    #[test]
    fn test_update_employee_partial() {
        let mut conn = setup_test_db();
        let emp = insert_employee(&mut conn, new_employee("Vikram Malhotra", 5.0)).unwrap();

        let updated = update_employee(
            &mut conn,
            emp.id,
            UpdateEmployeeRequest {
                home_commute_distance_km: Some(7.5),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.name, "Vikram Malhotra");
        assert_eq!(updated.home_address, emp.home_address);
        assert_eq!(updated.home_commute_distance_km, 7.5);
    }

    #[test]
    fn test_update_missing_employee_is_not_found() {
        let mut conn = setup_test_db();
        let result = update_employee(&mut conn, 99, UpdateEmployeeRequest::default());
        assert!(matches!(result, Err(diesel::result::Error::NotFound)));
    }

    #[test]
    fn test_delete_employee() {
        let mut conn = setup_test_db();
        let emp = insert_employee(&mut conn, new_employee("Temp", 5.0)).unwrap();
        assert!(delete_employee(&mut conn, emp.id).unwrap());
        assert!(!delete_employee(&mut conn, emp.id).unwrap());
        assert!(get_employee(&mut conn, emp.id).unwrap().is_none());
    }
}
