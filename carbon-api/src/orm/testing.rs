use std::sync::Mutex;

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket, fairing::AdHoc};
use rocket_sync_db_pools::diesel;

use super::company_config::config_init_fairing;
use super::db::{DbConn, run_pending_migrations, set_foreign_keys};
use super::login::hash_password;
use super::user::{get_user_by_email, insert_user};
use crate::admin_init_fairing::admin_init_fairing;
use crate::models::UserInput;

/// Login of the non-administrator account every `test_rocket()` carries.
pub const TEST_STAFF_EMAIL: &str = "staff@example.com";
pub const TEST_STAFF_PASSWORD: &str = "staffpass";

/// Configures SQLite with performance-optimized settings for testing.
///
/// Sets the following PRAGMAs:
/// - `synchronous = OFF`: Disables synchronous writes for faster performance
/// - `journal_mode = OFF`: Disables rollback journal
///
/// These settings make SQLite faster but less durable - only use for testing.
///
/// # Panics
/// Panics if the PRAGMA commands fail to execute
fn set_sqlite_test_pragmas(conn: &mut diesel::SqliteConnection) {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        PRAGMA journal_mode = OFF;
        "#,
    )
    .expect("Failed to set SQLite PRAGMAs");
}

/// Creates a Rocket fairing that sets SQLite testing pragmas.
fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::on_ignite("Set SQLite Test Pragmas", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for test pragmas");
        conn.run(|c| {
            set_sqlite_test_pragmas(c);
        })
        .await;
        rocket
    })
}

/// Creates the regular (non-superuser) account used by access-control tests.
fn create_test_data(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    if get_user_by_email(conn, TEST_STAFF_EMAIL)?.is_some() {
        return Ok(());
    }
    insert_user(
        conn,
        UserInput {
            email: TEST_STAFF_EMAIL.to_string(),
            password_hash: hash_password(TEST_STAFF_PASSWORD),
            is_superuser: false,
        },
    )?;
    Ok(())
}

/// Creates a Rocket fairing that initializes standard test data.
fn test_data_init_fairing() -> AdHoc {
    AdHoc::on_ignite("Test Data Initialization", |rocket| async {
        let conn = DbConn::get_one(&rocket)
            .await
            .expect("database connection for test data initialization");
        conn.run(|c| {
            if let Err(e) = create_test_data(c) {
                eprintln!("[test-data-init] ERROR: Failed to create test data: {:?}", e);
            }
        })
        .await;
        rocket
    })
}

/// Creates and configures a Rocket instance for testing with an in-memory SQLite database.
///
/// The returned Rocket instance will have:
/// - A private shared in-memory SQLite database
/// - Database connection pool attached
/// - Foreign keys enabled
/// - Testing pragmas set
/// - All migrations run
/// - The default superuser and a regular staff account created
/// - The company config row created with built-in defaults
/// - API routes and JSON catchers mounted
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    // Every instance gets its own database so tests can run in parallel
    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let figment = rocket::Config::figment().merge(("databases", map!["sqlite_db" => db_config]));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing())
        .attach(admin_init_fairing())
        .attach(test_data_init_fairing())
        .attach(config_init_fairing());
    crate::register_catchers(crate::mount_api_routes(rocket))
}

/// Creates a synchronous in-memory SQLite database connection for unit tests.
///
/// Migrations are applied and foreign keys enabled. Each call returns a new,
/// independent database.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn);
    run_pending_migrations(&mut conn);
    conn
}

/// A minimal async-compatible wrapper around a synchronous SQLite connection.
///
/// Code written against `DbRunner` can be driven with this in unit tests
/// exactly as it is with the pooled `DbConn`.
pub struct FakeDbConn(Mutex<SqliteConnection>);

impl FakeDbConn {
    /// Runs `f` with exclusive access to the wrapped connection.
    ///
    /// # Panics
    /// Panics if a previous closure panicked while holding the connection.
    pub async fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        let mut conn = self.0.lock().expect("test connection lock poisoned");
        f(&mut conn)
    }
}

/// Wraps a connection (typically from `setup_test_db()`) in a `FakeDbConn`.
pub fn setup_test_dbconn(conn: SqliteConnection) -> FakeDbConn {
    FakeDbConn(Mutex::new(conn))
}
