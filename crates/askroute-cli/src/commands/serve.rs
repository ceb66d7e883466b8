//! Native messaging host

use anyhow::{Context, Result};
use askroute_core::{config::get_data_dir, MessageHost};
use askroute_storage::Database;
use std::path::PathBuf;

/// Send logs to `<data dir>/askroute.log`; stdout carries the protocol.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened
pub fn setup_host_logging() -> Result<()> {
    use std::fs::{create_dir_all, OpenOptions};

    let log_path = get_data_dir()?.join("askroute.log");

    if let Some(parent) = log_path.parent() {
        create_dir_all(parent)?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format_timestamp_secs()
        .init();

    Ok(())
}

/// Serve extension messages until stdin closes
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the stream breaks
pub async fn serve_command(db_path: Option<PathBuf>) -> Result<()> {
    let db = Database::new(db_path)?;
    let mut host = MessageHost::new(db)?;

    log::info!("Native messaging host started (pid {})", std::process::id());
    host.run(tokio::io::stdin(), tokio::io::stdout()).await
}
