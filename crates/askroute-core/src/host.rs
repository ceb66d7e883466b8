use anyhow::{Context, Result};
use askroute_storage::{Database, Settings};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    classifier::{QuestionClassifier, RuleProfile},
    config::RoutingConfig,
    interceptor::{Decision, Interceptor},
    protocol::{self, InboundMessage, OutboundMessage, Reply},
};

/// Build the classifier configured in `settings`
///
/// Falls back to the default built-in profile when the configured one
/// cannot be loaded, so a broken profile file never stops routing.
///
/// # Errors
///
/// Returns an error only if the built-in fallback fails to compile
pub fn classifier_from_settings(settings: &Settings) -> Result<QuestionClassifier> {
    let profile = RuleProfile::resolve(
        &settings.rule_profile,
        settings.profile_path.as_deref().map(Path::new),
    )
    .unwrap_or_else(|e| {
        log::warn!("Failed to load rule profile: {e}; using classic");
        RuleProfile::classic()
    });

    QuestionClassifier::new(&profile).context("Failed to compile rule profile")
}

/// Serves extension messages one at a time against the local database
pub struct MessageHost {
    database: Database,
    config: RoutingConfig,
    interceptor: Interceptor,
}

impl MessageHost {
    /// Load settings and the rule profile from `database`
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be read
    pub fn new(database: Database) -> Result<Self> {
        let settings = database.get_settings()?;
        let classifier = classifier_from_settings(&settings)?;
        let config = RoutingConfig::from(&settings);

        log::info!(
            "Message host ready (destination: {}, routing: {}, profile: {} v{})",
            config.selected_destination,
            if config.routing_enabled { "on" } else { "off" },
            classifier.profile_name(),
            classifier.profile_version()
        );

        Ok(Self::with_parts(database, config, Interceptor::new(classifier)))
    }

    #[must_use]
    pub fn with_parts(database: Database, config: RoutingConfig, interceptor: Interceptor) -> Self {
        Self {
            database,
            config,
            interceptor,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Handle one message to completion and build its reply
    pub fn handle_message(&mut self, message: InboundMessage) -> OutboundMessage {
        match message {
            InboundMessage::UpdateDestination { value } => {
                if value.parse::<crate::Destination>().is_err() {
                    log::warn!("Selected unknown destination '{value}'; searches will not be redirected");
                }
                if let Err(e) = self.database.set_selected_destination(&value) {
                    log::warn!("Failed to persist destination: {e}");
                }
                log::info!("Destination set to {value}");
                self.config.set_destination(value);
                OutboundMessage::success()
            }
            InboundMessage::ToggleRouting { value } => {
                if let Err(e) = self.database.set_routing_enabled(value) {
                    log::warn!("Failed to persist routing flag: {e}");
                }
                log::info!("Routing {}", if value { "enabled" } else { "disabled" });
                self.config.set_routing_enabled(value);
                OutboundMessage::success()
            }
            InboundMessage::Navigate(event) => {
                match self
                    .interceptor
                    .handle(&self.config, &event, &mut self.database)
                {
                    Ok(Some(Decision::Redirect { destination, url })) => Reply::Redirect {
                        tab_id: event.tab_id,
                        destination,
                        url,
                    }
                    .into(),
                    Ok(Some(Decision::Proceed) | None) => Reply::Proceed.into(),
                    Err(e) => {
                        log::error!("Failed to record navigation: {e}");
                        Reply::Proceed.into()
                    }
                }
            }
            InboundMessage::GetStats => match self.database.get_usage_map() {
                Ok(usage_counters) => Reply::Stats { usage_counters }.into(),
                Err(e) => {
                    log::error!("Failed to read usage counters: {e}");
                    OutboundMessage::error(format!("failed to read usage counters: {e}"))
                }
            },
            InboundMessage::GetConfig => Reply::Config(self.config.clone()).into(),
        }
    }

    /// Read framed messages from `reader` until end of input, replying on `writer`
    ///
    /// # Errors
    ///
    /// Returns an error if the stream breaks or a frame cannot be read
    pub async fn run<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut handled: u64 = 0;

        while let Some(body) = protocol::read_frame(&mut reader).await? {
            let reply = match protocol::decode_message::<InboundMessage>(&body) {
                Ok(message) => self.handle_message(message),
                Err(e) => {
                    log::warn!("Rejected message: {e}");
                    OutboundMessage::error(e.to_string())
                }
            };
            protocol::write_message(&mut writer, &reply).await?;
            handled += 1;
        }

        log::info!("Input closed after {handled} messages, stopping host");
        Ok(())
    }
}
