use carbon_api::models::{EmployeeInput, NewEmployee, UpdateEmployeeRequest};
use carbon_api::orm::employee::{
    delete_employee, get_all_employees, get_employee, insert_employee, update_employee,
};
use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use super::utils::{confirm, filter_by_term};

#[derive(Subcommand)]
pub enum EmployeeAction {
    #[command(about = "List employees, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
    },
    #[command(about = "Add a new employee")]
    Add {
        #[arg(short, long, help = "Employee name")]
        name: String,
        #[arg(long, help = "Home address (defaults to \"Home\")")]
        home_address: Option<String>,
        #[arg(short, long, help = "One-way home commute distance in km (defaults to 10)")]
        distance_km: Option<f64>,
    },
    #[command(about = "Edit employee fields")]
    Edit {
        #[arg(short, long, help = "Employee ID to edit")]
        id: i32,
        #[arg(long, help = "New name")]
        name: Option<String>,
        #[arg(long, help = "New home address")]
        home_address: Option<String>,
        #[arg(short, long, help = "New one-way home commute distance in km")]
        distance_km: Option<f64>,
    },
    #[command(about = "Remove employees matching search term, with all their logs")]
    Rm {
        #[arg(
            help = "Search term to match employees for removal (regex by default, use -F for fixed string)"
        )]
        search_term: String,
        #[arg(
            short = 'F',
            long = "fixed-string",
            help = "Treat search term as fixed string instead of regex"
        )]
        fixed_string: bool,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
}

pub fn handle_employee_command_with_conn(
    conn: &mut SqliteConnection,
    action: EmployeeAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        EmployeeAction::Ls { search_term, fixed_string } => {
            employee_ls_impl(conn, search_term, fixed_string)?;
        }
        EmployeeAction::Add { name, home_address, distance_km } => {
            employee_add_impl(conn, name, home_address, distance_km)?;
        }
        EmployeeAction::Edit { id, name, home_address, distance_km } => {
            employee_edit_impl(conn, id, name, home_address, distance_km)?;
        }
        EmployeeAction::Rm { search_term, fixed_string, yes } => {
            employee_rm_impl(conn, search_term, fixed_string, yes)?;
        }
    }
    Ok(())
}

pub fn employee_ls_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let employees = filter_by_term(
        get_all_employees(conn)?,
        search_term.as_deref(),
        fixed_string,
        |e| e.name.as_str(),
    )?;

    if employees.is_empty() {
        println!("No employees found.");
    } else {
        println!("Employees:");
        for employee in employees {
            println!(
                "  ID: {}, Name: {}, Home: {}, Commute: {} km",
                employee.id, employee.name, employee.home_address, employee.home_commute_distance_km
            );
        }
    }

    Ok(())
}

pub fn employee_add_impl(
    conn: &mut SqliteConnection,
    name: String,
    home_address: Option<String>,
    distance_km: Option<f64>,
) -> Result<i32, Box<dyn std::error::Error>> {
    if name.trim().is_empty() {
        return Err("Employee name must not be empty".into());
    }

    let input = EmployeeInput {
        name,
        home_address,
        home_commute_distance_km: distance_km,
    };
    let created = insert_employee(conn, NewEmployee::from(input))?;

    println!("Employee created successfully!");
    println!("ID: {}", created.id);
    println!("Name: {}", created.name);
    println!("Home: {}", created.home_address);
    println!("Commute: {} km", created.home_commute_distance_km);

    Ok(created.id)
}

pub fn employee_edit_impl(
    conn: &mut SqliteConnection,
    employee_id: i32,
    name: Option<String>,
    home_address: Option<String>,
    distance_km: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if get_employee(conn, employee_id)?.is_none() {
        return Err(format!("Employee with ID {} does not exist", employee_id).into());
    }

    if name.is_none() && home_address.is_none() && distance_km.is_none() {
        println!("No fields specified for update. Use --name, --home-address, or --distance-km.");
        return Ok(());
    }

    let updated = update_employee(
        conn,
        employee_id,
        UpdateEmployeeRequest {
            name,
            home_address,
            home_commute_distance_km: distance_km,
        },
    )?;

    println!("Employee updated successfully!");
    println!("ID: {}", updated.id);
    println!("Name: {}", updated.name);
    println!("Home: {}", updated.home_address);
    println!("Commute: {} km", updated.home_commute_distance_km);

    Ok(())
}

pub fn employee_rm_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let matching = filter_by_term(
        get_all_employees(conn)?,
        Some(search_term.as_str()),
        fixed_string,
        |e| e.name.as_str(),
    )?;

    if matching.is_empty() {
        println!("No employees found matching the search term.");
        return Ok(0);
    }

    println!("Found {} employee(s) matching the search term:", matching.len());
    for employee in &matching {
        println!("  ID: {}, Name: {}", employee.id, employee.name);
    }

    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete these {} employee(s) and all their logs?",
            matching.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(0);
    }

    let mut deleted_count = 0;
    let mut errors = Vec::new();

    for employee in matching {
        match delete_employee(conn, employee.id) {
            Ok(true) => {
                deleted_count += 1;
                println!("Deleted employee: {} (ID: {})", employee.name, employee.id);
            }
            Ok(false) => {}
            Err(e) => errors.push(format!(
                "Failed to delete employee {} (ID: {}): {}",
                employee.name, employee.id, e
            )),
        }
    }

    println!("Successfully deleted {} employee(s).", deleted_count);

    if !errors.is_empty() {
        println!("Errors encountered:");
        for error in errors {
            println!("  {}", error);
        }
        return Err("Some deletions failed".into());
    }

    Ok(deleted_count)
}
