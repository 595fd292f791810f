// carbon-admin/src/main.rs

use clap::{Parser, Subcommand};

mod admin_cli;

use admin_cli::{
    ConfigAction, DEFAULT_SEED_DAYS, EmployeeAction, ReportAction, UserAction,
    establish_connection, handle_config_command_with_conn, handle_employee_command_with_conn,
    handle_report_command_with_conn, handle_seed_command_with_conn, handle_user_command_with_conn,
};

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser)]
#[command(name = "carbon-admin")]
#[command(about = "Administration tool for the carbon tracker database")]
#[command(version)]
struct Cli {
    /// Show extended version information
    #[arg(long, action = clap::ArgAction::SetTrue)]
    version_info: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Employee management commands")]
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },
    #[command(about = "Login account management commands")]
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    #[command(about = "Company settings commands")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(about = "Populate the database with demo employees and logs")]
    Seed {
        #[arg(long, default_value_t = DEFAULT_SEED_DAYS, help = "Number of days of logs to create")]
        days: u32,
    },
    #[command(about = "Emission reports")]
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.version_info {
        println!("carbon-admin {}", built_info::PKG_VERSION);
        println!("Built: {}", built_info::BUILT_TIME_UTC);
        if let Some(commit) = built_info::GIT_COMMIT_HASH {
            println!("Git commit: {}", commit);
        }
        return Ok(());
    }

    let Some(command) = cli.command else {
        eprintln!("No command given. Run with --help for usage.");
        std::process::exit(2);
    };

    let mut conn = establish_connection()?;

    match command {
        Commands::Employee { action } => handle_employee_command_with_conn(&mut conn, action),
        Commands::User { action } => handle_user_command_with_conn(&mut conn, action),
        Commands::Config { action } => handle_config_command_with_conn(&mut conn, action),
        Commands::Seed { days } => handle_seed_command_with_conn(&mut conn, days),
        Commands::Report { action } => handle_report_command_with_conn(&mut conn, action),
    }
}
