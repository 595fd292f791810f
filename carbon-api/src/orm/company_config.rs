//! Persistence for the company settings singleton.
//!
//! The row always has id 1 and a `CHECK` constraint forbids any other id.
//! Creation goes through `INSERT OR IGNORE`, so the first writer wins and
//! later inserts leave the stored values alone.

use diesel::prelude::*;
use rocket::fairing::AdHoc;

use crate::models::{COMPANY_CONFIG_ID, CompanyConfig, CompanyConfigDefaults, CompanyConfigUpdate};
use crate::orm::DbConn;

/// Inserts the singleton unless it already exists, then returns the stored
/// row. When a row is already present the supplied values are discarded.
pub fn insert_config(
    conn: &mut SqliteConnection,
    values: &CompanyConfigDefaults,
) -> Result<CompanyConfig, diesel::result::Error> {
    use crate::schema::company_config::dsl::*;

    diesel::insert_or_ignore_into(company_config)
        .values((
            id.eq(COMPANY_CONFIG_ID),
            total_monthly_electricity_bill_kwh.eq(values.total_monthly_electricity_bill_kwh),
            grid_intensity.eq(values.grid_intensity),
            total_cloud_usage_kwh.eq(values.total_cloud_usage_kwh),
            server_count.eq(values.server_count),
        ))
        .execute(conn)?;

    company_config
        .filter(id.eq(COMPANY_CONFIG_ID))
        .select(CompanyConfig::as_select())
        .first(conn)
}

/// Returns the singleton if it has been created.
pub fn get_config(
    conn: &mut SqliteConnection,
) -> Result<Option<CompanyConfig>, diesel::result::Error> {
    use crate::schema::company_config::dsl::*;
    company_config
        .filter(id.eq(COMPANY_CONFIG_ID))
        .select(CompanyConfig::as_select())
        .first(conn)
        .optional()
}

/// Returns the singleton, creating it from `defaults` on first access.
pub fn get_or_create_config(
    conn: &mut SqliteConnection,
    defaults: &CompanyConfigDefaults,
) -> Result<CompanyConfig, diesel::result::Error> {
    match get_config(conn)? {
        Some(config) => Ok(config),
        None => insert_config(conn, defaults),
    }
}

/// Overwrites the supplied fields of the singleton and returns the result.
pub fn update_config(
    conn: &mut SqliteConnection,
    defaults: &CompanyConfigDefaults,
    update: &CompanyConfigUpdate,
) -> Result<CompanyConfig, diesel::result::Error> {
    use crate::schema::company_config::dsl::*;

    let current = get_or_create_config(conn, defaults)?;

    diesel::update(company_config.filter(id.eq(COMPANY_CONFIG_ID)))
        .set((
            total_monthly_electricity_bill_kwh.eq(update
                .total_monthly_electricity_bill_kwh
                .unwrap_or(current.total_monthly_electricity_bill_kwh)),
            grid_intensity.eq(update.grid_intensity.unwrap_or(current.grid_intensity)),
            total_cloud_usage_kwh.eq(update
                .total_cloud_usage_kwh
                .unwrap_or(current.total_cloud_usage_kwh)),
            server_count.eq(update.server_count.unwrap_or(current.server_count)),
        ))
        .execute(conn)?;

    company_config
        .filter(id.eq(COMPANY_CONFIG_ID))
        .select(CompanyConfig::as_select())
        .first(conn)
}

/// Loads the singleton defaults from the `carbon` figment section, makes
/// sure the row exists, and manages the defaults as Rocket state.
pub fn config_init_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Company Config Initialization", |rocket| async {
        let defaults = match rocket.figment().extract_inner::<CompanyConfigDefaults>("carbon") {
            Ok(defaults) => defaults,
            Err(e) if e.missing() => CompanyConfigDefaults::default(),
            Err(e) => {
                error!("[config-init] Invalid `carbon` configuration: {}", e);
                return Err(rocket);
            }
        };

        let conn = match DbConn::get_one(&rocket).await {
            Some(conn) => conn,
            None => {
                error!("[config-init] ERROR: Could not get DB connection.");
                return Err(rocket);
            }
        };

        match conn.run(move |c| get_or_create_config(c, &defaults)).await {
            Ok(config) => {
                info!(
                    "[config-init] Electricity {} kWh, grid intensity {} kg/kWh, cloud {} kWh",
                    config.total_monthly_electricity_bill_kwh,
                    config.grid_intensity,
                    config.total_cloud_usage_kwh
                );
                Ok(rocket.manage(defaults))
            }
            Err(e) => {
                error!("[config-init] FATAL: Could not create company config: {:?}", e);
                Err(rocket)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;

    #[test]
    fn test_get_or_create_uses_defaults() {
        let mut conn = setup_test_db();
        assert!(get_config(&mut conn).unwrap().is_none());

        let config = get_or_create_config(&mut conn, &CompanyConfigDefaults::default()).unwrap();
        assert_eq!(config.id, COMPANY_CONFIG_ID);
        assert_eq!(config.total_monthly_electricity_bill_kwh, 1000.0);
        assert_eq!(config.grid_intensity, 0.82);
        assert_eq!(config.total_cloud_usage_kwh, 500.0);
        assert_eq!(config.server_count, 10);
    }

    #[test]
    fn test_second_insert_keeps_first_values() {
        let mut conn = setup_test_db();
        let first = CompanyConfigDefaults {
            total_monthly_electricity_bill_kwh: 1200.0,
            grid_intensity: 0.5,
            total_cloud_usage_kwh: 300.0,
            server_count: 4,
        };
        let second = CompanyConfigDefaults {
            total_monthly_electricity_bill_kwh: 1.0,
            grid_intensity: 9.9,
            total_cloud_usage_kwh: 2.0,
            server_count: 99,
        };

        let stored_first = insert_config(&mut conn, &first).unwrap();
        let stored_second = insert_config(&mut conn, &second).unwrap();
        assert_eq!(stored_first, stored_second);
        assert_eq!(stored_second.total_monthly_electricity_bill_kwh, 1200.0);
        assert_eq!(stored_second.server_count, 4);

        use crate::schema::company_config::dsl::company_config;
        let rows: i64 = company_config.count().get_result(&mut conn).unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_second_row_rejected_by_check() {
        let mut conn = setup_test_db();
        insert_config(&mut conn, &CompanyConfigDefaults::default()).unwrap();

        let result =
            diesel::sql_query("INSERT INTO company_config (id) VALUES (2)").execute(&mut conn);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_overwrites_only_supplied_fields() {
        let mut conn = setup_test_db();
        let defaults = CompanyConfigDefaults::default();
        get_or_create_config(&mut conn, &defaults).unwrap();

        let update = CompanyConfigUpdate {
            grid_intensity: Some(0.4),
            server_count: Some(3),
            ..Default::default()
        };
        let updated = update_config(&mut conn, &defaults, &update).unwrap();
        assert_eq!(updated.grid_intensity, 0.4);
        assert_eq!(updated.server_count, 3);
        assert_eq!(updated.total_monthly_electricity_bill_kwh, 1000.0);
        assert_eq!(updated.total_cloud_usage_kwh, 500.0);
    }

    #[test]
    fn test_update_accepts_negative_values() {
        let mut conn = setup_test_db();
        let defaults = CompanyConfigDefaults::default();
        let update = CompanyConfigUpdate {
            total_monthly_electricity_bill_kwh: Some(-50.0),
            ..Default::default()
        };
        let updated = update_config(&mut conn, &defaults, &update).unwrap();
        assert_eq!(updated.total_monthly_electricity_bill_kwh, -50.0);
    }
}
