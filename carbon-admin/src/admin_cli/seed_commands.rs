//! Demo data for a fresh installation.
//!
//! Seeding is idempotent for employees and the config row, but every run
//! replaces all daily logs with a new random set.

use carbon_api::emissions::CommuteMode;
use carbon_api::models::{CompanyConfigDefaults, DailyLogInput, NewEmployee};
use carbon_api::orm::company_config::get_or_create_config;
use carbon_api::orm::daily_log::{delete_all_daily_logs, insert_daily_log_on, today};
use carbon_api::orm::employee::{get_employee_by_name, insert_employee};
use chrono::{Days, NaiveDate};
use diesel::sqlite::SqliteConnection;
use rand::Rng;
use rand::prelude::IndexedRandom;

pub const DEMO_EMPLOYEES: [&str; 5] = [
    "Aarav Patel",
    "Diya Sharma",
    "Rohan Gupta",
    "Ananya Singh",
    "Vikram Malhotra",
];

pub const DEFAULT_SEED_DAYS: u32 = 7;

const SEED_MODES: [CommuteMode; 6] = [
    CommuteMode::Metro,
    CommuteMode::Ev,
    CommuteMode::Car,
    CommuteMode::Auto,
    CommuteMode::Bike,
    CommuteMode::Wfh,
];

const SEED_HOURS: [f64; 5] = [8.0, 8.0, 9.0, 7.5, 8.5];

const AWAY_LOCATION: &str = "Client Site";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub employees_created: usize,
    pub logs_removed: usize,
    pub logs_created: usize,
}

pub fn handle_seed_command_with_conn(
    conn: &mut SqliteConnection,
    days: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Seeding data...");
    let summary = seed_impl(conn, days, today(), &mut rand::rng())?;
    println!(
        "Created {} employee(s); {} already existed.",
        summary.employees_created,
        DEMO_EMPLOYEES.len() - summary.employees_created
    );
    println!("Removed {} existing log(s).", summary.logs_removed);
    println!("Created {} log(s) over {} day(s).", summary.logs_created, days);
    println!("Seeding complete!");
    Ok(())
}

/// Seeds the database, logging `days` days ending on `end`.
pub fn seed_impl<R: Rng>(
    conn: &mut SqliteConnection,
    days: u32,
    end: NaiveDate,
    rng: &mut R,
) -> Result<SeedSummary, Box<dyn std::error::Error>> {
    get_or_create_config(conn, &CompanyConfigDefaults::default())?;

    let mut employees = Vec::with_capacity(DEMO_EMPLOYEES.len());
    let mut employees_created = 0;
    for name in DEMO_EMPLOYEES {
        let employee = match get_employee_by_name(conn, name)? {
            Some(existing) => existing,
            None => {
                employees_created += 1;
                insert_employee(
                    conn,
                    NewEmployee {
                        name: name.to_string(),
                        home_address: format!("Locality {}, Bengaluru", rng.random_range(1..=20)),
                        home_commute_distance_km: (rng.random_range(5.0..=25.0_f64) * 10.0)
                            .round()
                            / 10.0,
                    },
                )?
            }
        };
        employees.push(employee);
    }

    let logs_removed = delete_all_daily_logs(conn)?;

    let mut logs_created = 0;
    for offset in 0..days {
        let day = end
            .checked_sub_days(Days::new(u64::from(offset)))
            .ok_or("Seed range reaches before the earliest representable date")?;
        for employee in &employees {
            let is_home = rng.random_bool(0.75);
            let mode = SEED_MODES.choose(rng).copied().unwrap_or(CommuteMode::Metro);
            let input = DailyLogInput {
                employee_id: employee.id,
                hours_worked: SEED_HOURS.choose(rng).copied(),
                is_home_commute: Some(is_home),
                start_location: (!is_home).then(|| AWAY_LOCATION.to_string()),
                commute_mode: Some(mode.code().to_string()),
                commute_distance_km: None,
                vcpu_hours: Some(f64::from(rng.random_range(0..=10_u32))),
                storage_gb: Some(f64::from(rng.random_range(0..=50_u32))),
            };
            insert_daily_log_on(conn, &input, day)?;
            logs_created += 1;
        }
    }

    Ok(SeedSummary {
        employees_created,
        logs_removed,
        logs_created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbon_api::orm::daily_log::get_all_logs;
    use carbon_api::orm::employee::get_all_employees;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn end_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn test_seed_creates_employees_and_logs() {
        let mut conn = setup();
        let mut rng = StdRng::seed_from_u64(7);

        let summary = seed_impl(&mut conn, 7, end_date(), &mut rng).unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                employees_created: 5,
                logs_removed: 0,
                logs_created: 35,
            }
        );

        let employees = get_all_employees(&mut conn).unwrap();
        assert_eq!(employees.len(), 5);
        for employee in &employees {
            assert!(employee.home_address.starts_with("Locality "));
            assert!(employee.home_address.ends_with(", Bengaluru"));
            assert!((5.0..=25.0).contains(&employee.home_commute_distance_km));
        }

        let logs = get_all_logs(&mut conn).unwrap();
        assert_eq!(logs.len(), 35);
        assert_eq!(logs.first().unwrap().date, end_date());
        assert_eq!(logs.last().unwrap().date, NaiveDate::from_ymd_opt(2025, 6, 24).unwrap());
        for log in &logs {
            assert!(SEED_HOURS.contains(&log.hours_worked));
            assert!(log.mode().is_some_and(|m| SEED_MODES.contains(&m)));
            assert!((0.0..=10.0).contains(&log.vcpu_hours));
            assert!((0.0..=50.0).contains(&log.storage_gb));
            if log.is_home_commute {
                assert_eq!(log.start_location, None);
            } else {
                assert_eq!(log.start_location.as_deref(), Some(AWAY_LOCATION));
                assert_eq!(log.commute_distance_km, 16.5);
            }
        }
    }

    #[test]
    fn test_reseed_keeps_employees_and_replaces_logs() {
        let mut conn = setup();
        let mut rng = StdRng::seed_from_u64(11);

        seed_impl(&mut conn, 7, end_date(), &mut rng).unwrap();
        let before = get_all_employees(&mut conn).unwrap();

        let summary = seed_impl(&mut conn, 3, end_date(), &mut rng).unwrap();
        assert_eq!(summary.employees_created, 0);
        assert_eq!(summary.logs_removed, 35);
        assert_eq!(summary.logs_created, 15);

        assert_eq!(get_all_employees(&mut conn).unwrap(), before);
        assert_eq!(get_all_logs(&mut conn).unwrap().len(), 15);
    }

    fn setup() -> SqliteConnection {
        carbon_api::orm::testing::setup_test_db()
    }
}
