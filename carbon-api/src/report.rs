//! Employee and company emission reports.
//!
//! The `*Totals` types hold exact sums; the `*Report` types are the rounded
//! figures handed to clients.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::emissions::round_to;
use crate::models::{CompanyConfig, DailyLog, DailyLogWithEmissions, Employee};

/// Number of recent logs shown on an employee dashboard.
pub const EMPLOYEE_RECENT_LOGS: usize = 5;

/// Number of recent logs shown on the company dashboard.
pub const COMPANY_RECENT_LOGS: i64 = 10;

/// Lower bound on total hours so the per-hour metric never divides by zero.
pub const MIN_TOTAL_HOURS: f64 = 0.1;

/// Inclusive date bounds. Both ends open means all time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(type = "string | null")]
    pub since: Option<NaiveDate>,
    #[ts(type = "string | null")]
    pub until: Option<NaiveDate>,
}

impl DateRange {
    pub fn all_time() -> Self {
        DateRange::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since.is_none_or(|since| date >= since) && self.until.is_none_or(|until| date <= until)
    }
}

/// Exact sums of the per-log emissions.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LogTotals {
    pub commute_emissions: f64,
    pub digital_emissions: f64,
    pub hours_worked: f64,
    pub log_count: usize,
}

impl LogTotals {
    pub fn from_logs<'a, I>(logs: I) -> Self
    where
        I: IntoIterator<Item = &'a DailyLog>,
    {
        logs.into_iter().fold(LogTotals::default(), |mut acc, log| {
            acc.commute_emissions += log.commute_emissions();
            acc.digital_emissions += log.digital_carbon_footprint();
            acc.hours_worked += log.hours_worked;
            acc.log_count += 1;
            acc
        })
    }

    pub fn total_emissions(&self) -> f64 {
        self.commute_emissions + self.digital_emissions
    }
}

/// Date labels and per-log totals, oldest first.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Builds the series from logs ordered newest first.
    pub fn from_newest_first(logs: &[DailyLog]) -> Self {
        let mut series = ChartSeries::default();
        for log in logs.iter().rev() {
            series.labels.push(log.date.format("%Y-%m-%d").to_string());
            series.values.push(round_to(log.total_emissions(), 2));
        }
        series
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeReport {
    pub employee: Employee,
    pub range: DateRange,
    pub total_emissions: f64,
    pub commute_emissions: f64,
    pub digital_emissions: f64,
    pub log_count: usize,
    /// Newest first.
    pub recent_logs: Vec<DailyLogWithEmissions>,
    pub chart: ChartSeries,
}

impl EmployeeReport {
    /// Builds the report from the employee's logs, ordered newest first.
    pub fn new(employee: Employee, range: DateRange, logs: Vec<DailyLog>) -> Self {
        let totals = LogTotals::from_logs(&logs);
        let chart = ChartSeries::from_newest_first(&logs);
        let recent_logs = logs
            .into_iter()
            .take(EMPLOYEE_RECENT_LOGS)
            .map(DailyLogWithEmissions::from)
            .collect();

        EmployeeReport {
            employee,
            range,
            total_emissions: round_to(totals.total_emissions(), 2),
            commute_emissions: round_to(totals.commute_emissions, 2),
            digital_emissions: round_to(totals.digital_emissions, 2),
            log_count: totals.log_count,
            recent_logs,
            chart,
        }
    }
}

/// Exact company-wide figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompanyTotals {
    pub office_emissions: f64,
    pub cloud_emissions: f64,
    pub commute_emissions: f64,
    pub digital_emissions: f64,
    pub total_emissions: f64,
    pub total_hours: f64,
    pub carbon_cost_per_hour: f64,
    pub log_count: usize,
}

impl CompanyTotals {
    pub fn compute(config: &CompanyConfig, logs: &[DailyLog]) -> Self {
        let office_emissions = config.total_monthly_electricity_bill_kwh * config.grid_intensity;
        let cloud_emissions = config.total_cloud_usage_kwh * config.grid_intensity;
        let log_totals = LogTotals::from_logs(logs);

        let total_emissions = office_emissions
            + cloud_emissions
            + log_totals.commute_emissions
            + log_totals.digital_emissions;
        let total_hours = log_totals.hours_worked.max(MIN_TOTAL_HOURS);

        CompanyTotals {
            office_emissions,
            cloud_emissions,
            commute_emissions: log_totals.commute_emissions,
            digital_emissions: log_totals.digital_emissions,
            total_emissions,
            total_hours,
            carbon_cost_per_hour: total_emissions / total_hours,
            log_count: log_totals.log_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompanyReport {
    pub config: CompanyConfig,
    pub total_emissions: f64,
    pub office_emissions: f64,
    pub cloud_emissions: f64,
    pub commute_emissions: f64,
    pub digital_emissions: f64,
    /// Digital and cloud together, the figure the dashboard shows as "digital".
    pub digital_and_cloud_emissions: f64,
    pub total_hours: f64,
    pub carbon_cost_per_hour: f64,
    pub log_count: usize,
    pub employee_count: i64,
    /// Newest first, across all employees.
    pub recent_logs: Vec<DailyLogWithEmissions>,
}

impl CompanyReport {
    pub fn new(
        config: CompanyConfig,
        logs: &[DailyLog],
        recent: Vec<(DailyLog, Employee)>,
        employee_count: i64,
    ) -> Self {
        let totals = CompanyTotals::compute(&config, logs);
        let recent_logs = recent
            .into_iter()
            .map(|(log, employee)| DailyLogWithEmissions {
                employee_name: Some(employee.name),
                ..DailyLogWithEmissions::from(log)
            })
            .collect();

        CompanyReport {
            config,
            total_emissions: round_to(totals.total_emissions, 2),
            office_emissions: round_to(totals.office_emissions, 2),
            cloud_emissions: round_to(totals.cloud_emissions, 2),
            commute_emissions: round_to(totals.commute_emissions, 2),
            digital_emissions: round_to(totals.digital_emissions, 2),
            digital_and_cloud_emissions: round_to(
                totals.digital_emissions + totals.cloud_emissions,
                2,
            ),
            total_hours: round_to(totals.total_hours, 1),
            carbon_cost_per_hour: round_to(totals.carbon_cost_per_hour, 4),
            log_count: totals.log_count,
            employee_count,
            recent_logs,
        }
    }
}
