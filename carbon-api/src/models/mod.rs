pub mod company_config;
pub mod daily_log;
pub mod employee;
pub mod session;
pub mod user;

// Re-export models for easier access
pub use company_config::*;
pub use daily_log::*;
pub use employee::*;
pub use session::*;
pub use user::*;
