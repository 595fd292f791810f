//! TypeScript type generation module.
//!
//! This module exports TypeScript type definitions for all the structs
//! annotated with `#[ts(export)]`. When this file is compiled (typically
//! during testing), it generates .ts files in the specified output directory.

#[cfg(test)]
mod tests {
    use std::{env, path::Path};

    use ts_rs::TS;

    #[test]
    fn generate_typescript_types() {
        // Determine output directory in order of preference:
        // 1. Environment variable CARBON_TS_OUTPUT_DIR
        // 2. ../../frontend/src/types/generated (if the front end is checked out)
        // 3. ../ts-bindings (fallback)

        let output_dir_str = if let Ok(env_dir) = env::var("CARBON_TS_OUTPUT_DIR") {
            println!("Using TypeScript output directory from CARBON_TS_OUTPUT_DIR: {}", env_dir);
            env_dir
        } else {
            let frontend_dir = "../../frontend/src/types/generated";
            let fallback_dir = "../ts-bindings";

            if Path::new(frontend_dir).parent().unwrap_or(Path::new("")).exists() {
                println!("Using front end directory: {}", frontend_dir);
                frontend_dir.to_string()
            } else {
                println!("Using fallback directory: {}", fallback_dir);
                fallback_dir.to_string()
            }
        };

        let output_dir = Path::new(&output_dir_str);

        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir).expect("Failed to create output directory");
        }

        // Remove stale .ts files so renamed or deleted types don't linger
        println!("Cleaning old TypeScript files from {:?}", output_dir);
        for entry in std::fs::read_dir(output_dir).expect("Failed to read output directory") {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("ts") {
                std::fs::remove_file(&path)
                    .unwrap_or_else(|e| panic!("Failed to remove {:?}: {}", path, e));
            }
        }

        unsafe {
            env::set_var("TS_RS_EXPORT_DIR", output_dir);
        }

        use crate::{
            api::{ErrorResponse, login::LoginSuccessResponse, status::HealthStatus},
            emissions::CommuteMode,
            models::*,
            report::{ChartSeries, CompanyReport, DateRange, EmployeeReport},
        };

        User::export().expect("Failed to export User type");

        Employee::export().expect("Failed to export Employee type");
        EmployeeInput::export().expect("Failed to export EmployeeInput type");
        UpdateEmployeeRequest::export().expect("Failed to export UpdateEmployeeRequest type");

        CommuteMode::export().expect("Failed to export CommuteMode type");
        DailyLog::export().expect("Failed to export DailyLog type");
        DailyLogInput::export().expect("Failed to export DailyLogInput type");
        UpdateDailyLogRequest::export().expect("Failed to export UpdateDailyLogRequest type");
        DailyLogWithEmissions::export().expect("Failed to export DailyLogWithEmissions type");

        CompanyConfig::export().expect("Failed to export CompanyConfig type");
        CompanyConfigUpdate::export().expect("Failed to export CompanyConfigUpdate type");

        // Report types
        DateRange::export().expect("Failed to export DateRange type");
        ChartSeries::export().expect("Failed to export ChartSeries type");
        EmployeeReport::export().expect("Failed to export EmployeeReport type");
        CompanyReport::export().expect("Failed to export CompanyReport type");

        // API types
        ErrorResponse::export().expect("Failed to export ErrorResponse type");
        LoginSuccessResponse::export().expect("Failed to export LoginSuccessResponse type");
        HealthStatus::export().expect("Failed to export HealthStatus type");

        println!("TypeScript types generated successfully in {:?}", output_dir);
    }
}
