use std::io::{self, Write};

use carbon_api::orm::{run_pending_migrations, set_foreign_keys};
use chrono::NaiveDate;
use diesel::{prelude::*, sqlite::SqliteConnection};
use dotenvy::dotenv;
use regex::Regex;

pub fn establish_connection() -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let mut conn = SqliteConnection::establish(&database_url)?;
    set_foreign_keys(&mut conn);
    run_pending_migrations(&mut conn);
    Ok(conn)
}

/// Keeps the items whose key matches `term`.
///
/// The term is a regex unless `fixed_string` is set, in which case it is a
/// plain substring. No term keeps everything.
pub fn filter_by_term<T, F>(
    items: Vec<T>,
    term: Option<&str>,
    fixed_string: bool,
    key: F,
) -> Result<Vec<T>, Box<dyn std::error::Error>>
where
    F: Fn(&T) -> &str,
{
    let Some(term) = term else {
        return Ok(items);
    };

    if fixed_string {
        Ok(items.into_iter().filter(|item| key(item).contains(term)).collect())
    } else {
        let regex =
            Regex::new(term).map_err(|e| format!("Invalid regex pattern '{}': {}", term, e))?;
        Ok(items.into_iter().filter(|item| regex.is_match(key(item))).collect())
    }
}

/// Asks a yes/no question on stdin. Anything but "y" or "yes" is a no.
pub fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();

    Ok(input == "y" || input == "yes")
}

/// Parses a `YYYY-MM-DD` command line date.
pub fn parse_date(value: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", value, e).into())
}
