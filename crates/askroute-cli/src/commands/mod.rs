pub mod classify;
pub mod config;
pub mod init;
pub mod route;
pub mod serve;
pub mod stats;
