use anyhow::Result;
use rusqlite::{params, Connection};

use crate::models::Settings;

/// Initialize database schema
///
/// # Errors
///
/// Returns an error if table creation fails
pub fn init_schema(conn: &Connection) -> Result<()> {
    // Settings table - single row (id = 1) holding routing preferences
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            selected_destination TEXT NOT NULL,
            routing_enabled INTEGER NOT NULL DEFAULT 1,
            rule_profile TEXT NOT NULL DEFAULT 'classic',
            profile_path TEXT,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // Usage counters - one row per destination plus the unchanged sentinel
    conn.execute(
        "CREATE TABLE IF NOT EXISTS usage_counters (
            key TEXT PRIMARY KEY,
            count INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Insert the default settings row when none exists yet
///
/// # Errors
///
/// Returns an error if the insert fails
pub fn insert_default_settings(conn: &Connection) -> Result<()> {
    let defaults = Settings::default_settings();
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO settings
            (id, selected_destination, routing_enabled, rule_profile, profile_path, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, datetime('now'))",
        params![
            defaults.selected_destination,
            defaults.routing_enabled,
            defaults.rule_profile,
            defaults.profile_path,
        ],
    )?;

    if inserted > 0 {
        log::info!("Inserted default settings");
    }
    Ok(())
}
