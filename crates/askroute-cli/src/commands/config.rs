//! Configuration management command handlers

use anyhow::Result;
use askroute_core::{QuestionClassifier, RuleProfile};
use askroute_storage::{Database, Settings};
use std::path::{Path, PathBuf};

/// A running host keeps its in-memory settings until it restarts
const RESTART_HINT: &str = "Restart the native host (reload the extension) to apply.";

/// Config action types
pub enum ConfigActionType {
    Get { key: String },
    Set { key: String, value: String },
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigKey {
    SelectedDestination,
    RoutingEnabled,
    RuleProfile,
    ProfilePath,
}

impl ConfigKey {
    const ALL: [Self; 4] = [
        Self::SelectedDestination,
        Self::RoutingEnabled,
        Self::RuleProfile,
        Self::ProfilePath,
    ];

    fn parse(key: &str) -> Result<Self> {
        match key.trim() {
            "selectedDestination" | "selected_destination" | "destination" => {
                Ok(Self::SelectedDestination)
            }
            "routingEnabled" | "routing_enabled" | "enabled" => Ok(Self::RoutingEnabled),
            "ruleProfile" | "rule_profile" | "profile" => Ok(Self::RuleProfile),
            "profilePath" | "profile_path" => Ok(Self::ProfilePath),
            _ => anyhow::bail!(
                "Unknown config key: {key}. Use selectedDestination, routingEnabled, ruleProfile or profilePath"
            ),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::SelectedDestination => "selectedDestination",
            Self::RoutingEnabled => "routingEnabled",
            Self::RuleProfile => "ruleProfile",
            Self::ProfilePath => "profilePath",
        }
    }

    fn value(self, settings: &Settings) -> Option<String> {
        match self {
            Self::SelectedDestination => Some(settings.selected_destination.clone()),
            Self::RoutingEnabled => Some(settings.routing_enabled.to_string()),
            Self::RuleProfile => Some(settings.rule_profile.clone()),
            Self::ProfilePath => settings.profile_path.clone(),
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => anyhow::bail!("Expected true/false, got '{value}'"),
    }
}

/// Validate `value` for `key` and apply it to `settings`
fn apply_config_value(settings: &mut Settings, key: ConfigKey, value: &str) -> Result<()> {
    match key {
        ConfigKey::SelectedDestination => {
            let destination: askroute_core::Destination =
                value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            settings.selected_destination = destination.id().to_string();
        }
        ConfigKey::RoutingEnabled => settings.routing_enabled = parse_bool(value)?,
        ConfigKey::RuleProfile => {
            let profile = RuleProfile::builtin(value)?;
            settings.rule_profile = profile.name;
        }
        ConfigKey::ProfilePath => {
            let value = value.trim();
            if value.is_empty() || value == "none" {
                settings.profile_path = None;
            } else {
                // Reject files that would not load when the host starts
                let profile = RuleProfile::from_file(Path::new(value))?;
                QuestionClassifier::new(&profile)?;
                settings.profile_path = Some(value.to_string());
            }
        }
    }
    Ok(())
}

pub fn handle_config(db_path: Option<PathBuf>, action: ConfigActionType) -> Result<()> {
    let db = Database::new(db_path)?;
    let mut settings = db.get_settings()?;

    match action {
        ConfigActionType::Get { key } => {
            let key = ConfigKey::parse(&key)?;
            match key.value(&settings) {
                Some(v) => println!("{} = {v}", key.name()),
                None => println!("{} is not set", key.name()),
            }
        }
        ConfigActionType::Set { key, value } => {
            let key = ConfigKey::parse(&key)?;
            apply_config_value(&mut settings, key, &value)?;
            db.update_settings(&settings)?;
            println!(
                "Set {} = {}",
                key.name(),
                key.value(&settings).unwrap_or_else(|| "(unset)".to_string())
            );
            println!("{RESTART_HINT}");
        }
        ConfigActionType::List => {
            println!("Configuration:");
            println!("{}", "=".repeat(30));
            for key in ConfigKey::ALL {
                let value = key.value(&settings).unwrap_or_else(|| "(unset)".to_string());
                println!("  {} = {value}", key.name());
            }
        }
    }

    Ok(())
}

pub fn handle_routing(db_path: Option<PathBuf>, enable: Option<bool>) -> Result<()> {
    let db = Database::new(db_path)?;

    if let Some(enabled) = enable {
        db.set_routing_enabled(enabled)?;
    }

    let settings = db.get_settings()?;
    println!(
        "Routing: {} (destination: {})",
        if settings.routing_enabled {
            "ON"
        } else {
            "OFF"
        },
        settings.selected_destination
    );
    if enable.is_some() {
        println!("{RESTART_HINT}");
    }
    Ok(())
}
