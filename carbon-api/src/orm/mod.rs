pub mod company_config;
pub mod daily_log;
mod db;
pub mod employee;
pub mod login;
pub mod logout;
pub mod testing;
pub mod user;

pub use db::*;
