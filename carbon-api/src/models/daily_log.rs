use chrono::NaiveDate;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::emissions::{self, CommuteMode, DEFAULT_COMMUTE_MODE};
use crate::schema::daily_logs;

pub const DEFAULT_HOURS_WORKED: f64 = 8.0;

#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    TS,
)]
#[diesel(belongs_to(crate::models::employee::Employee))]
#[diesel(table_name = daily_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct DailyLog {
    pub id: i32,
    pub employee_id: i32, // Foreign key to Employee
    #[ts(type = "string")]
    pub date: NaiveDate,
    pub hours_worked: f64,
    pub is_home_commute: bool,
    pub start_location: Option<String>,
    pub commute_mode: String,
    /// One-way distance, resolved when the log is written.
    pub commute_distance_km: f64,
    pub vcpu_hours: f64,
    pub storage_gb: f64,
}

impl DailyLog {
    /// Round-trip commute emissions in kg CO2.
    pub fn commute_emissions(&self) -> f64 {
        emissions::commute_emissions(self.commute_distance_km, &self.commute_mode)
    }

    /// Compute and storage emissions in kg CO2.
    pub fn digital_carbon_footprint(&self) -> f64 {
        emissions::digital_carbon_footprint(self.vcpu_hours, self.storage_gb)
    }

    pub fn total_emissions(&self) -> f64 {
        self.commute_emissions() + self.digital_carbon_footprint()
    }

    pub fn mode(&self) -> Option<CommuteMode> {
        self.commute_mode.parse().ok()
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = daily_logs)]
pub struct NewDailyLog {
    pub employee_id: i32,
    pub date: NaiveDate,
    pub hours_worked: f64,
    pub is_home_commute: bool,
    pub start_location: Option<String>,
    pub commute_mode: String,
    pub commute_distance_km: f64,
    pub vcpu_hours: f64,
    pub storage_gb: f64,
}

// For API inputs. The date is never taken from the client.
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct DailyLogInput {
    pub employee_id: i32,
    #[serde(default)]
    pub hours_worked: Option<f64>,
    #[serde(default)]
    pub is_home_commute: Option<bool>,
    #[serde(default)]
    pub start_location: Option<String>,
    #[serde(default)]
    pub commute_mode: Option<String>,
    #[serde(default)]
    pub commute_distance_km: Option<f64>,
    #[serde(default)]
    pub vcpu_hours: Option<f64>,
    #[serde(default)]
    pub storage_gb: Option<f64>,
}

impl DailyLogInput {
    /// Empty start locations are stored as absent.
    pub fn start_location(&self) -> Option<String> {
        self.start_location.clone().filter(|s| !s.is_empty())
    }

    pub fn commute_mode_code(&self) -> String {
        self.commute_mode
            .clone()
            .unwrap_or_else(|| DEFAULT_COMMUTE_MODE.code().to_string())
    }
}

/// Partial update of an existing log; `None` fields keep their stored value.
#[derive(Debug, Default, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UpdateDailyLogRequest {
    pub hours_worked: Option<f64>,
    pub is_home_commute: Option<bool>,
    pub start_location: Option<String>,
    pub commute_mode: Option<String>,
    pub commute_distance_km: Option<f64>,
    pub vcpu_hours: Option<f64>,
    pub storage_gb: Option<f64>,
}

// Response struct carrying the derived emission figures
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyLogWithEmissions {
    #[serde(flatten)]
    pub log: DailyLog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub commute_emissions: f64,
    pub digital_carbon_footprint: f64,
    pub total_emissions: f64,
}

impl From<DailyLog> for DailyLogWithEmissions {
    fn from(log: DailyLog) -> Self {
        DailyLogWithEmissions {
            commute_emissions: log.commute_emissions(),
            digital_carbon_footprint: log.digital_carbon_footprint(),
            total_emissions: log.total_emissions(),
            employee_name: None,
            log,
        }
    }
}
