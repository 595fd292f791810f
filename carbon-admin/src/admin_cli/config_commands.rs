use carbon_api::models::{CompanyConfig, CompanyConfigDefaults, CompanyConfigUpdate};
use carbon_api::orm::company_config::{get_or_create_config, update_config};
use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Show the company sustainability settings")]
    Show,
    #[command(about = "Update company settings; unspecified fields keep their value")]
    Set {
        #[arg(long = "electricity-kwh", help = "Monthly office electricity use in kWh")]
        electricity_kwh: Option<f64>,
        #[arg(long = "grid-intensity", help = "Grid carbon intensity in kg CO2 per kWh")]
        grid_intensity: Option<f64>,
        #[arg(long = "cloud-kwh", help = "Cloud infrastructure use in kWh")]
        cloud_kwh: Option<f64>,
        #[arg(long = "server-count", help = "Number of on-premise servers")]
        server_count: Option<i32>,
    },
}

pub fn handle_config_command_with_conn(
    conn: &mut SqliteConnection,
    action: ConfigAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            config_show_impl(conn)?;
        }
        ConfigAction::Set {
            electricity_kwh,
            grid_intensity,
            cloud_kwh,
            server_count,
        } => {
            let update = CompanyConfigUpdate {
                total_monthly_electricity_bill_kwh: electricity_kwh,
                grid_intensity,
                total_cloud_usage_kwh: cloud_kwh,
                server_count,
            };
            config_set_impl(conn, update)?;
        }
    }
    Ok(())
}

fn print_config(config: &CompanyConfig) {
    println!("Electricity: {} kWh", config.total_monthly_electricity_bill_kwh);
    println!("Grid intensity: {} kg CO2/kWh", config.grid_intensity);
    println!("Cloud usage: {} kWh", config.total_cloud_usage_kwh);
    println!("Servers: {}", config.server_count);
}

pub fn config_show_impl(
    conn: &mut SqliteConnection,
) -> Result<CompanyConfig, Box<dyn std::error::Error>> {
    let config = get_or_create_config(conn, &CompanyConfigDefaults::default())?;
    println!("Company configuration:");
    print_config(&config);
    Ok(config)
}

pub fn config_set_impl(
    conn: &mut SqliteConnection,
    update: CompanyConfigUpdate,
) -> Result<CompanyConfig, Box<dyn std::error::Error>> {
    if update.total_monthly_electricity_bill_kwh.is_none()
        && update.grid_intensity.is_none()
        && update.total_cloud_usage_kwh.is_none()
        && update.server_count.is_none()
    {
        println!(
            "No fields specified for update. Use --electricity-kwh, --grid-intensity, --cloud-kwh, or --server-count."
        );
        return config_show_impl(conn);
    }

    let config = update_config(conn, &CompanyConfigDefaults::default(), &update)?;
    println!("Company configuration updated successfully!");
    print_config(&config);
    Ok(config)
}
