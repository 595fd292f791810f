pub mod config_commands;
pub mod employee_commands;
pub mod report_commands;
pub mod seed_commands;
pub mod user_commands;
pub mod utils;

pub use config_commands::{ConfigAction, handle_config_command_with_conn};
pub use employee_commands::{EmployeeAction, handle_employee_command_with_conn};
pub use report_commands::{ReportAction, handle_report_command_with_conn};
pub use seed_commands::{DEFAULT_SEED_DAYS, handle_seed_command_with_conn};
pub use user_commands::{UserAction, handle_user_command_with_conn};
pub use utils::establish_connection;
