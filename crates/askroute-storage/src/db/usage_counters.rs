//! Usage counter database operations

use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use std::collections::BTreeMap;

use crate::models::UsageCounter;

use super::{helpers, Database};

impl Database {
    /// Add one to the counter for `key`, creating it on first use
    ///
    /// Single upsert so a concurrent writer cannot lose an increment.
    ///
    /// # Errors
    ///
    /// Returns an error if the database upsert fails
    pub fn increment_usage(&self, key: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "INSERT INTO usage_counters (key, count, updated_at)
             VALUES (?1, 1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                count = count + 1,
                updated_at = excluded.updated_at
             RETURNING count",
            params![key, Utc::now().to_rfc3339()],
            |row| row.get(0),
        )?;
        log::debug!("Usage counter '{key}' -> {count}");
        Ok(helpers::parse_count(count)?)
    }

    /// Current count for `key` (0 when never incremented)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_usage_count(&self, key: &str) -> Result<u64> {
        let count: Option<i64> = self
            .conn
            .query_row(
                "SELECT count FROM usage_counters WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match count {
            Some(n) => Ok(helpers::parse_count(n)?),
            None => Ok(0),
        }
    }

    /// All counters, ordered by count (highest first)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row holds a corrupted value
    pub fn get_usage_counters(&self) -> Result<Vec<UsageCounter>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, count, updated_at FROM usage_counters ORDER BY count DESC, key ASC",
        )?;

        let counters = stmt
            .query_map([], |row| {
                Ok(UsageCounter {
                    key: row.get(0)?,
                    count: helpers::parse_count(row.get(1)?)?,
                    updated_at: helpers::parse_datetime(&row.get::<_, String>(2)?)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counters)
    }

    /// Counters as a plain `key -> count` mapping
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub fn get_usage_map(&self) -> Result<BTreeMap<String, u64>> {
        Ok(self
            .get_usage_counters()?
            .into_iter()
            .map(|c| (c.key, c.count))
            .collect())
    }

    /// Delete every counter, returning how many rows were removed
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails
    pub fn reset_usage(&self) -> Result<usize> {
        let deleted = self.conn.execute("DELETE FROM usage_counters", [])?;
        log::info!("Reset {deleted} usage counters");
        Ok(deleted)
    }
}
