//! First-time setup

use anyhow::Result;
use askroute_storage::Database;
use std::path::PathBuf;

/// Create the database (if needed) and print the active settings
///
/// # Errors
///
/// Returns an error if the database cannot be created
pub fn init_command(db_path: Option<PathBuf>) -> Result<()> {
    println!("Initializing askroute...\n");

    let db = Database::new(db_path)?;
    let settings = db.get_settings()?;

    println!("Database ready.");
    println!("  destination     = {}", settings.selected_destination);
    println!("  routing enabled = {}", settings.routing_enabled);
    println!("  rule profile    = {}", settings.rule_profile);
    println!("\nRegister `askroute serve` as the extension's native messaging host.");
    println!("Try a query with: askroute classify \"how do lifetimes work\" --explain");

    Ok(())
}
