use anyhow::Result;
use askroute_storage::Settings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::destination::Destination;

/// Get the local data directory for askroute.
///
/// # Errors
///
/// Returns an error if the local data directory cannot be determined.
pub fn get_data_dir() -> Result<PathBuf> {
    let mut path =
        dirs::data_local_dir().ok_or_else(|| anyhow::anyhow!("Failed to get local data dir"))?;
    path.push("askroute");
    Ok(path)
}

/// Current routing settings, read by the interceptor on every navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingConfig {
    /// Raw identifier; unknown values mean "never redirect"
    pub selected_destination: String,
    pub routing_enabled: bool,
}

impl RoutingConfig {
    #[must_use]
    pub fn new(selected_destination: impl Into<String>, routing_enabled: bool) -> Self {
        Self {
            selected_destination: selected_destination.into(),
            routing_enabled,
        }
    }

    /// The selected destination, if its identifier is known
    #[must_use]
    pub fn destination(&self) -> Option<Destination> {
        self.selected_destination.parse().ok()
    }

    pub fn set_destination(&mut self, identifier: impl Into<String>) {
        self.selected_destination = identifier.into();
    }

    pub fn set_routing_enabled(&mut self, enabled: bool) {
        self.routing_enabled = enabled;
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self::new(Destination::default().id(), true)
    }
}

impl From<&Settings> for RoutingConfig {
    fn from(settings: &Settings) -> Self {
        Self::new(settings.selected_destination.clone(), settings.routing_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoutingConfig::default();
        assert_eq!(config.selected_destination, "claude");
        assert!(config.routing_enabled);
        assert_eq!(config.destination(), Some(Destination::Claude));
    }

    #[test]
    fn test_unknown_destination() {
        let mut config = RoutingConfig::default();
        config.set_destination("bing");
        assert_eq!(config.selected_destination, "bing");
        assert_eq!(config.destination(), None);
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default_settings();
        settings.selected_destination = "meta".to_string();
        settings.routing_enabled = false;

        let config = RoutingConfig::from(&settings);
        assert_eq!(config.destination(), Some(Destination::Meta));
        assert!(!config.routing_enabled);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(RoutingConfig::default()).unwrap();
        assert_eq!(json["selectedDestination"], "claude");
        assert_eq!(json["routingEnabled"], true);
    }
}
