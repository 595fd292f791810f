use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::employees;

pub const DEFAULT_HOME_ADDRESS: &str = "Home";
pub const DEFAULT_HOME_COMMUTE_DISTANCE_KM: f64 = 10.0;

#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS,
)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub home_address: String,
    /// One-way distance from home to the office.
    pub home_commute_distance_km: f64,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = employees)]
pub struct NewEmployee {
    pub name: String,
    pub home_address: String,
    pub home_commute_distance_km: f64,
}

// For API inputs and validation
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct EmployeeInput {
    pub name: String,
    #[serde(default)]
    pub home_address: Option<String>,
    #[serde(default)]
    pub home_commute_distance_km: Option<f64>,
}

impl From<EmployeeInput> for NewEmployee {
    fn from(input: EmployeeInput) -> Self {
        NewEmployee {
            name: input.name,
            home_address: input
                .home_address
                .unwrap_or_else(|| DEFAULT_HOME_ADDRESS.to_string()),
            home_commute_distance_km: input
                .home_commute_distance_km
                .unwrap_or(DEFAULT_HOME_COMMUTE_DISTANCE_KM),
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub home_address: Option<String>,
    pub home_commute_distance_km: Option<f64>,
}
