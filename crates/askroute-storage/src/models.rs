use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Destination identifier used until the user picks another one
pub const DEFAULT_DESTINATION: &str = "claude";

/// Rule profile used until the user picks another one
pub const DEFAULT_RULE_PROFILE: &str = "classic";

/// Persisted routing settings (single row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Raw destination identifier; validated by the caller at decision time
    pub selected_destination: String,
    pub routing_enabled: bool,
    /// Name of the built-in rule profile
    pub rule_profile: String,
    /// Optional TOML file overriding the built-in profile
    pub profile_path: Option<String>,
}

impl Settings {
    #[must_use]
    pub fn default_settings() -> Self {
        Self {
            selected_destination: DEFAULT_DESTINATION.to_string(),
            routing_enabled: true,
            rule_profile: DEFAULT_RULE_PROFILE.to_string(),
            profile_path: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::default_settings()
    }
}

/// One usage counter row - how many navigations ended at `key`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageCounter {
    pub key: String,
    pub count: u64,
    pub updated_at: DateTime<Utc>,
}
