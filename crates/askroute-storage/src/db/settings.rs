//! Routing settings database operations

use anyhow::Result;
use rusqlite::{params, OptionalExtension};

use crate::models::Settings;

use super::Database;

impl Database {
    /// Get routing settings, falling back to defaults when the row is missing
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_settings(&self) -> Result<Settings> {
        let result = self
            .conn
            .query_row(
                "SELECT selected_destination, routing_enabled, rule_profile, profile_path
                 FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok(Settings {
                        selected_destination: row.get(0)?,
                        routing_enabled: row.get::<_, i32>(1)? != 0,
                        rule_profile: row.get(2)?,
                        profile_path: row.get(3)?,
                    })
                },
            )
            .optional()?;

        if let Some(settings) = result {
            Ok(settings)
        } else {
            let settings = Settings::default_settings();
            self.update_settings(&settings)?;
            Ok(settings)
        }
    }

    /// Save all routing settings
    ///
    /// # Errors
    ///
    /// Returns an error if the database upsert fails
    pub fn update_settings(&self, settings: &Settings) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (id, selected_destination, routing_enabled, rule_profile, profile_path, updated_at)
             VALUES (1, ?1, ?2, ?3, ?4, datetime('now'))
             ON CONFLICT(id) DO UPDATE SET
                selected_destination = excluded.selected_destination,
                routing_enabled = excluded.routing_enabled,
                rule_profile = excluded.rule_profile,
                profile_path = excluded.profile_path,
                updated_at = excluded.updated_at",
            params![
                settings.selected_destination,
                i32::from(settings.routing_enabled),
                settings.rule_profile,
                settings.profile_path,
            ],
        )?;
        Ok(())
    }

    /// Persist the selected destination identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails
    pub fn set_selected_destination(&self, destination: &str) -> Result<()> {
        let mut settings = self.get_settings()?;
        settings.selected_destination = destination.to_string();
        self.update_settings(&settings)
    }

    /// Persist the routing on/off flag
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails
    pub fn set_routing_enabled(&self, enabled: bool) -> Result<()> {
        let mut settings = self.get_settings()?;
        settings.routing_enabled = enabled;
        self.update_settings(&settings)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DEFAULT_DESTINATION, DEFAULT_RULE_PROFILE};

    #[test]
    fn test_default_settings() {
        let db = Database::open_in_memory().unwrap();
        let settings = db.get_settings().unwrap();

        assert_eq!(settings.selected_destination, DEFAULT_DESTINATION);
        assert!(settings.routing_enabled);
        assert_eq!(settings.rule_profile, DEFAULT_RULE_PROFILE);
        assert!(settings.profile_path.is_none());
    }

    #[test]
    fn test_update_settings_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let mut settings = db.get_settings().unwrap();
        settings.selected_destination = "perplexity".to_string();
        settings.rule_profile = "strict".to_string();
        settings.profile_path = Some("/tmp/rules.toml".to_string());
        db.update_settings(&settings).unwrap();

        assert_eq!(db.get_settings().unwrap(), settings);
    }

    #[test]
    fn test_set_single_fields() {
        let db = Database::open_in_memory().unwrap();
        db.set_selected_destination("gemini").unwrap();
        db.set_routing_enabled(false).unwrap();

        let settings = db.get_settings().unwrap();
        assert_eq!(settings.selected_destination, "gemini");
        assert!(!settings.routing_enabled);
        // Untouched fields keep their defaults
        assert_eq!(settings.rule_profile, DEFAULT_RULE_PROFILE);
    }

    #[test]
    fn test_missing_row_recreated() {
        let db = Database::open_in_memory().unwrap();
        db.conn.execute("DELETE FROM settings", []).unwrap();

        let settings = db.get_settings().unwrap();
        assert_eq!(settings.selected_destination, DEFAULT_DESTINATION);
    }
}
