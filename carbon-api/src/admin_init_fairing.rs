use diesel::prelude::*;
use dotenvy::dotenv;
use rocket::Rocket;
use rocket::fairing::AdHoc;

use crate::models::{User, UserInput};
use crate::orm::DbConn;
use crate::orm::login::hash_password;
use crate::orm::user::{get_user_by_email, insert_user, set_superuser};

/// Add the default superuser if needed.
///
/// Set the default admin email/pass based on envars CARBON_DEFAULT_EMAIL and CARBON_DEFAULT_PASSWORD
pub fn admin_init_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Admin User Initialization", |rocket| async {
        dotenv().ok();

        let conn = match get_db_connection(&rocket).await {
            Some(conn) => conn,
            None => return Err(rocket),
        };

        let admin_email = get_admin_email();
        match conn
            .run(move |c| create_admin_user_if_needed(c, &admin_email))
            .await
        {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("[admin-init] FATAL: Admin user creation failed: {:?}", e);
                Err(rocket)
            }
        }
    })
}

async fn get_db_connection(rocket: &Rocket<rocket::Build>) -> Option<DbConn> {
    match DbConn::get_one(rocket).await {
        Some(conn) => Some(conn),
        None => {
            error!("[admin-init] ERROR: Could not get DB connection.");
            None
        }
    }
}

fn get_admin_email() -> String {
    std::env::var("CARBON_DEFAULT_EMAIL").unwrap_or_else(|_| "superadmin@example.com".to_string())
}

fn get_admin_password() -> String {
    std::env::var("CARBON_DEFAULT_PASSWORD").unwrap_or_else(|_| "admin".to_string())
}

fn create_admin_user_if_needed(
    c: &mut SqliteConnection,
    admin_email: &str,
) -> Result<(), diesel::result::Error> {
    match get_user_by_email(c, admin_email)? {
        Some(user) if user.is_superuser => {
            info!("[admin-init] Admin user '{}' already exists", admin_email);
            Ok(())
        }
        Some(user) => {
            // An existing account under the admin address is promoted
            set_superuser(c, user.id, true)?;
            info!("[admin-init] Granted superuser to existing user '{}'", admin_email);
            Ok(())
        }
        None => create_admin_user(c, admin_email).map(|_| ()),
    }
}

fn create_admin_user(
    c: &mut SqliteConnection,
    admin_email: &str,
) -> Result<User, diesel::result::Error> {
    let admin_user = UserInput {
        email: admin_email.to_string(),
        password_hash: hash_password(&get_admin_password()),
        is_superuser: true,
    };

    match insert_user(c, admin_user) {
        Ok(user) => {
            info!("[admin-init] Created admin user: '{}'", admin_email);
            Ok(user)
        }
        Err(e) => {
            error!("[admin-init] ERROR creating admin user: {:?}", e);
            Err(e)
        }
    }
}
