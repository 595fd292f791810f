use diesel::{Identifiable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::company_config;

/// Primary key of the one and only settings row.
pub const COMPANY_CONFIG_ID: i32 = 1;

/// Company-wide sustainability settings. Exactly one row exists.
#[derive(
    Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS,
)]
#[diesel(table_name = company_config)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct CompanyConfig {
    pub id: i32,
    /// Office electricity consumption in kWh.
    pub total_monthly_electricity_bill_kwh: f64,
    /// kg CO2 per kWh drawn from the grid.
    pub grid_intensity: f64,
    /// Cloud infrastructure consumption in kWh.
    pub total_cloud_usage_kwh: f64,
    /// On-premise servers. Not used by any emission formula.
    pub server_count: i32,
}

/// Values the singleton is created with when no row exists yet.
///
/// Read from the `carbon` section of the Rocket figment at startup; every
/// field falls back to the built-in default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyConfigDefaults {
    pub total_monthly_electricity_bill_kwh: f64,
    pub grid_intensity: f64,
    pub total_cloud_usage_kwh: f64,
    pub server_count: i32,
}

impl Default for CompanyConfigDefaults {
    fn default() -> Self {
        CompanyConfigDefaults {
            total_monthly_electricity_bill_kwh: 1000.0,
            grid_intensity: 0.82,
            total_cloud_usage_kwh: 500.0,
            server_count: 10,
        }
    }
}

/// Admin update of the settings. Fields left out keep their current value.
/// No range checks are applied; negative values are stored as given.
#[derive(Debug, Default, Clone, Deserialize, Serialize, TS, FromForm)]
#[ts(export)]
pub struct CompanyConfigUpdate {
    pub total_monthly_electricity_bill_kwh: Option<f64>,
    pub grid_intensity: Option<f64>,
    pub total_cloud_usage_kwh: Option<f64>,
    pub server_count: Option<i32>,
}
