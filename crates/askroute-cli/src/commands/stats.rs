//! Usage counter display

use anyhow::Result;
use askroute_core::{Destination, UNCHANGED_COUNTER_KEY};
use askroute_storage::{Database, UsageCounter};
use std::path::PathBuf;
use tabled::{Table, Tabled};

#[derive(Tabled, Debug, PartialEq, Eq)]
struct UsageRow {
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Searches")]
    count: u64,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Last used")]
    last_used: String,
}

/// One row per known destination and the unchanged sentinel (zero when unused),
/// plus any other stored key, highest count first
#[allow(clippy::cast_precision_loss)]
fn build_rows(counters: &[UsageCounter]) -> Vec<UsageRow> {
    let total: u64 = counters.iter().map(|c| c.count).sum();

    let mut keys: Vec<&str> = Destination::ALL.iter().map(|d| d.id()).collect();
    keys.push(UNCHANGED_COUNTER_KEY);
    for counter in counters {
        if !keys.contains(&counter.key.as_str()) {
            keys.push(&counter.key);
        }
    }

    let mut rows: Vec<UsageRow> = keys
        .into_iter()
        .map(|key| {
            let counter = counters.iter().find(|c| c.key == key);
            let count = counter.map_or(0, |c| c.count);
            let share = if total == 0 {
                "-".to_string()
            } else {
                format!("{:.1}%", count as f64 * 100.0 / total as f64)
            };
            UsageRow {
                destination: key.to_string(),
                count,
                share,
                last_used: counter.map_or_else(
                    || "-".to_string(),
                    |c| {
                        c.updated_at
                            .with_timezone(&chrono::Local)
                            .format("%Y-%m-%d %H:%M")
                            .to_string()
                    },
                ),
            }
        })
        .collect();

    // Stable sort keeps the table order for ties
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

pub fn stats_command(db_path: Option<PathBuf>, json: bool, reset: bool) -> Result<()> {
    let db = Database::new(db_path)?;

    if reset {
        let deleted = db.reset_usage()?;
        println!("Deleted {deleted} usage counters");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&db.get_usage_map()?)?);
        return Ok(());
    }

    let counters = db.get_usage_counters()?;
    let total: u64 = counters.iter().map(|c| c.count).sum();

    println!("{}", Table::new(build_rows(&counters)));
    println!("\nTotal searches: {total}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn counter(key: &str, count: u64) -> UsageCounter {
        UsageCounter {
            key: key.to_string(),
            count,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_rows_include_unused_destinations() {
        let rows = build_rows(&[]);
        assert_eq!(rows.len(), Destination::ALL.len() + 1);
        assert!(rows.iter().all(|r| r.count == 0 && r.share == "-"));
        assert!(rows.iter().any(|r| r.destination == UNCHANGED_COUNTER_KEY));
    }

    #[test]
    fn test_rows_sorted_with_shares() {
        let rows = build_rows(&[counter("unchanged", 1), counter("claude", 3)]);
        assert_eq!(rows[0].destination, "claude");
        assert_eq!(rows[0].share, "75.0%");
        assert_eq!(rows[1].destination, "unchanged");
        assert_eq!(rows[1].share, "25.0%");
        assert_eq!(rows[2].count, 0);
    }

    #[test]
    fn test_rows_keep_unknown_keys() {
        let rows = build_rows(&[counter("google", 2)]);
        assert_eq!(rows[0].destination, "google");
        assert_eq!(rows.len(), Destination::ALL.len() + 2);
    }
}
