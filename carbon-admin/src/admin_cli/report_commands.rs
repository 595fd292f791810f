use carbon_api::models::CompanyConfigDefaults;
use carbon_api::orm::company_config::get_or_create_config;
use carbon_api::orm::daily_log::{
    get_all_logs, get_logs_for_employee, get_recent_logs_with_employee,
};
use carbon_api::orm::employee::{count_employees, get_employee};
use carbon_api::report::{COMPANY_RECENT_LOGS, CompanyReport, DateRange, EmployeeReport};
use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use super::utils::parse_date;

#[derive(Subcommand)]
pub enum ReportAction {
    #[command(about = "Company-wide emissions and carbon cost per hour")]
    Company {
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
    #[command(about = "Emissions of a single employee")]
    Employee {
        #[arg(help = "Employee ID")]
        id: i32,
        #[arg(long, help = "First day to include (YYYY-MM-DD)")]
        since: Option<String>,
        #[arg(long, help = "Last day to include (YYYY-MM-DD)")]
        until: Option<String>,
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
}

pub fn handle_report_command_with_conn(
    conn: &mut SqliteConnection,
    action: ReportAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ReportAction::Company { json } => {
            let report = company_report_impl(conn)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_company_report(&report);
            }
        }
        ReportAction::Employee { id, since, until, json } => {
            let range = DateRange {
                since: since.as_deref().map(parse_date).transpose()?,
                until: until.as_deref().map(parse_date).transpose()?,
            };
            let report = employee_report_impl(conn, id, range)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_employee_report(&report);
            }
        }
    }
    Ok(())
}

pub fn company_report_impl(
    conn: &mut SqliteConnection,
) -> Result<CompanyReport, Box<dyn std::error::Error>> {
    let config = get_or_create_config(conn, &CompanyConfigDefaults::default())?;
    let logs = get_all_logs(conn)?;
    let recent = get_recent_logs_with_employee(conn, COMPANY_RECENT_LOGS)?;
    let employee_count = count_employees(conn)?;
    Ok(CompanyReport::new(config, &logs, recent, employee_count))
}

pub fn employee_report_impl(
    conn: &mut SqliteConnection,
    employee_id: i32,
    range: DateRange,
) -> Result<EmployeeReport, Box<dyn std::error::Error>> {
    let employee = get_employee(conn, employee_id)?
        .ok_or_else(|| format!("Employee with ID {} does not exist", employee_id))?;
    let logs = get_logs_for_employee(conn, employee_id, range)?;
    Ok(EmployeeReport::new(employee, range, logs))
}

fn print_company_report(report: &CompanyReport) {
    println!("Company emissions ({} employees, {} logs):", report.employee_count, report.log_count);
    println!("  Office:          {:>10.2} kg CO2", report.office_emissions);
    println!("  Cloud:           {:>10.2} kg CO2", report.cloud_emissions);
    println!("  Commute:         {:>10.2} kg CO2", report.commute_emissions);
    println!("  Digital:         {:>10.2} kg CO2", report.digital_emissions);
    println!("  Total:           {:>10.2} kg CO2", report.total_emissions);
    println!("  Hours worked:    {:>10.1}", report.total_hours);
    println!("  Cost per hour:   {:>10.4} kg CO2/h", report.carbon_cost_per_hour);

    if !report.recent_logs.is_empty() {
        println!("Recent logs:");
        for entry in &report.recent_logs {
            println!(
                "  {} {:<20} {:<6} {:>8.2} kg",
                entry.log.date,
                entry.employee_name.as_deref().unwrap_or("?"),
                entry.log.commute_mode,
                entry.total_emissions
            );
        }
    }
}

fn print_employee_report(report: &EmployeeReport) {
    println!(
        "Emissions for {} (ID: {}), {} logs:",
        report.employee.name, report.employee.id, report.log_count
    );
    println!("  Commute: {:>10.2} kg CO2", report.commute_emissions);
    println!("  Digital: {:>10.2} kg CO2", report.digital_emissions);
    println!("  Total:   {:>10.2} kg CO2", report.total_emissions);

    if !report.recent_logs.is_empty() {
        println!("Recent logs:");
        for entry in &report.recent_logs {
            println!(
                "  {} {:<6} {:>6.1} km {:>8.2} kg",
                entry.log.date,
                entry.log.commute_mode,
                entry.log.commute_distance_km,
                entry.total_emissions
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbon_api::models::{DailyLogInput, NewEmployee};
    use carbon_api::orm::daily_log::insert_daily_log_on;
    use carbon_api::orm::employee::insert_employee;
    use carbon_api::orm::testing::setup_test_db;
    use chrono::NaiveDate;

    fn log_input(employee_id: i32) -> DailyLogInput {
        DailyLogInput {
            employee_id,
            hours_worked: Some(9.0),
            is_home_commute: Some(true),
            start_location: None,
            commute_mode: Some("CAR".to_string()),
            commute_distance_km: None,
            vcpu_hours: Some(5.0),
            storage_gb: Some(20.0),
        }
    }

    #[test]
    fn test_company_report() {
        let mut conn = setup_test_db();
        let employee = insert_employee(
            &mut conn,
            NewEmployee {
                name: "Aarav Patel".to_string(),
                home_address: "Home".to_string(),
                home_commute_distance_km: 10.0,
            },
        )
        .unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        insert_daily_log_on(&mut conn, &log_input(employee.id), day).unwrap();

        let report = company_report_impl(&mut conn).unwrap();
        assert_eq!(report.office_emissions, 820.0);
        assert_eq!(report.total_emissions, 1233.7);
        assert!((report.carbon_cost_per_hour - 137.078).abs() < 1e-9);
        assert_eq!(report.employee_count, 1);
    }

    #[test]
    fn test_employee_report_range() {
        let mut conn = setup_test_db();
        let employee = insert_employee(
            &mut conn,
            NewEmployee {
                name: "Diya Sharma".to_string(),
                home_address: "Home".to_string(),
                home_commute_distance_km: 10.0,
            },
        )
        .unwrap();
        for day in 1..=3 {
            let date = NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
            insert_daily_log_on(&mut conn, &log_input(employee.id), date).unwrap();
        }

        let range = DateRange {
            since: Some(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()),
            until: None,
        };
        let report = employee_report_impl(&mut conn, employee.id, range).unwrap();
        assert_eq!(report.log_count, 2);
        assert_eq!(report.commute_emissions, 7.2);
        assert_eq!(report.chart.labels, vec!["2025-06-02", "2025-06-03"]);

        assert!(employee_report_impl(&mut conn, 999, DateRange::all_time()).is_err());
    }
}
