//! Database operations split into domain-specific modules.
//!
//! This module re-exports the main Database struct and all its operations.

mod helpers;
mod settings;
mod usage_counters;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::PathBuf;

use crate::migrations;

/// Database connection wrapper
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    /// Create a new database connection
    ///
    /// Uses `<local data dir>/askroute/askroute.db` when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if database directory creation, connection opening, or schema initialization fails
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = db_path.unwrap_or_else(Self::default_db_path);

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(&path).context("Failed to open database connection")?;
        let db = Self::from_connection(conn)?;

        log::info!("Database initialized at: {}", path.display());
        Ok(db)
    }

    /// Open a throwaway in-memory database with the full schema
    ///
    /// # Errors
    ///
    /// Returns an error if schema initialization fails
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::init_schema(&conn)?;
        migrations::insert_default_settings(&conn)?;
        Ok(Self { conn })
    }

    /// Get default database path
    fn default_db_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("askroute");
        path.push("askroute.db");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("askroute.db");

        let db = Database::new(Some(path.clone())).unwrap();
        assert!(path.exists());
        assert!(db.get_settings().unwrap().routing_enabled);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("askroute.db");

        {
            let db = Database::new(Some(path.clone())).unwrap();
            db.increment_usage("claude").unwrap();
            db.set_routing_enabled(false).unwrap();
        }

        let db = Database::new(Some(path)).unwrap();
        assert_eq!(db.get_usage_count("claude").unwrap(), 1);
        assert!(!db.get_settings().unwrap().routing_enabled);
    }
}
