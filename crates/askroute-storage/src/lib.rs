pub mod db;
pub mod migrations;
pub mod models;

pub use db::Database;
pub use models::{Settings, UsageCounter, DEFAULT_DESTINATION, DEFAULT_RULE_PROFILE};
