use anyhow::Result;
use askroute_storage::Database;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    classifier::QuestionClassifier,
    config::RoutingConfig,
    destination::{Destination, UNCHANGED_COUNTER_KEY},
};

/// Frame id the browser assigns to the top-level document
pub const TOP_LEVEL_FRAME: i64 = 0;

/// Where search navigations are recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEngine {
    /// Registrable host; subdomains (`www.`) also match
    pub host: String,
    /// Results path, compared exactly
    pub path: String,
    pub query_param: String,
}

impl SearchEngine {
    #[must_use]
    pub fn google() -> Self {
        Self {
            host: "google.com".to_string(),
            path: "/search".to_string(),
            query_param: "q".to_string(),
        }
    }

    fn matches_host(&self, host: &str) -> bool {
        host == self.host
            || host
                .strip_suffix(self.host.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// Search query carried by `url`, or `None` when it is not a search results URL
    #[must_use]
    pub fn extract_query(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        if !parsed.host_str().is_some_and(|host| self.matches_host(host)) {
            return None;
        }
        if parsed.path() != self.path {
            return None;
        }

        parsed
            .query_pairs()
            .find(|(key, _)| *key == self.query_param.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|query| !query.trim().is_empty())
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::google()
    }
}

/// An outgoing navigation reported by the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub frame_id: i64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<i64>,
}

impl NavigationEvent {
    #[must_use]
    pub fn top_level(url: impl Into<String>) -> Self {
        Self {
            frame_id: TOP_LEVEL_FRAME,
            url: url.into(),
            tab_id: None,
        }
    }
}

/// Outcome for a qualifying navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Replace the navigation with `url`
    Redirect { destination: Destination, url: String },
    /// Let the search engine handle it
    Proceed,
}

impl Decision {
    /// Usage counter this decision increments
    #[must_use]
    pub fn counter_key(&self) -> &'static str {
        match self {
            Self::Redirect { destination, .. } => destination.id(),
            Self::Proceed => UNCHANGED_COUNTER_KEY,
        }
    }

    #[must_use]
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Self::Redirect { url, .. } => Some(url.as_str()),
            Self::Proceed => None,
        }
    }
}

/// Persistent usage counters
pub trait UsageStore {
    /// Add one to the counter for `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written
    fn increment(&mut self, key: &str) -> Result<()>;
}

impl UsageStore for Database {
    fn increment(&mut self, key: &str) -> Result<()> {
        self.increment_usage(key)?;
        Ok(())
    }
}

/// Decides whether a search navigation goes to a conversational destination
pub struct Interceptor {
    classifier: QuestionClassifier,
    search_engine: SearchEngine,
}

impl Interceptor {
    #[must_use]
    pub fn new(classifier: QuestionClassifier) -> Self {
        Self {
            classifier,
            search_engine: SearchEngine::default(),
        }
    }

    #[must_use]
    pub fn with_search_engine(mut self, search_engine: SearchEngine) -> Self {
        self.search_engine = search_engine;
        self
    }

    #[must_use]
    pub fn classifier(&self) -> &QuestionClassifier {
        &self.classifier
    }

    /// Swap the rule set, e.g. after the profile setting changed
    pub fn set_classifier(&mut self, classifier: QuestionClassifier) {
        self.classifier = classifier;
    }

    /// Decision for `event` without side effects
    ///
    /// Returns `None` for events that do not qualify: routing disabled,
    /// sub-frame navigation, non-search URL or empty query.
    #[must_use]
    pub fn decide(&self, config: &RoutingConfig, event: &NavigationEvent) -> Option<Decision> {
        if !config.routing_enabled {
            return None;
        }
        if event.frame_id != TOP_LEVEL_FRAME {
            log::debug!("Ignoring sub-frame navigation (frame {})", event.frame_id);
            return None;
        }

        let query = self.search_engine.extract_query(&event.url)?;
        let verdict = self.classifier.classify_full(&query);
        log::debug!(
            "Query classified as {} by {} ({})",
            if verdict.question_like {
                "question"
            } else {
                "lookup"
            },
            verdict.rule,
            self.classifier.profile_name()
        );

        if !verdict.question_like {
            return Some(Decision::Proceed);
        }

        match config.destination() {
            Some(destination) => Some(Decision::Redirect {
                destination,
                url: destination.redirect_url(&query),
            }),
            None => {
                log::warn!(
                    "Unknown destination '{}', leaving navigation unchanged",
                    config.selected_destination
                );
                Some(Decision::Proceed)
            }
        }
    }

    /// Decide and record exactly one usage increment for qualifying events
    ///
    /// # Errors
    ///
    /// Returns an error if the usage store cannot be updated
    pub fn handle<S: UsageStore + ?Sized>(
        &self,
        config: &RoutingConfig,
        event: &NavigationEvent,
        store: &mut S,
    ) -> Result<Option<Decision>> {
        let Some(decision) = self.decide(config, event) else {
            return Ok(None);
        };

        store.increment(decision.counter_key())?;
        if let Decision::Redirect { destination, url } = &decision {
            log::info!("Redirecting search to {destination}: {url}");
        }
        Ok(Some(decision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::RuleProfile;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        counts: HashMap<String, u64>,
    }

    impl UsageStore for MemoryStore {
        fn increment(&mut self, key: &str) -> Result<()> {
            *self.counts.entry(key.to_string()).or_insert(0) += 1;
            Ok(())
        }
    }

    struct FailingStore;

    impl UsageStore for FailingStore {
        fn increment(&mut self, _key: &str) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    fn interceptor() -> Interceptor {
        Interceptor::new(QuestionClassifier::new(&RuleProfile::classic()).unwrap())
    }

    fn search(query: &str) -> NavigationEvent {
        NavigationEvent::top_level(format!(
            "https://www.google.com/search?q={}&hl=en",
            urlencoding::encode(query)
        ))
    }

    #[test]
    fn test_redirects_question_and_counts_destination() {
        let mut store = MemoryStore::default();
        let config = RoutingConfig::default();

        let decision = interceptor()
            .handle(&config, &search("how to fix a leaky faucet"), &mut store)
            .unwrap();

        assert_eq!(
            decision,
            Some(Decision::Redirect {
                destination: Destination::Claude,
                url: "https://claude.ai/new?q=how%20to%20fix%20a%20leaky%20faucet".to_string(),
            })
        );
        assert_eq!(store.counts.len(), 1);
        assert_eq!(store.counts["claude"], 1);
    }

    #[test]
    fn test_lookup_counts_unchanged() {
        let mut store = MemoryStore::default();
        let decision = interceptor()
            .handle(&RoutingConfig::default(), &search("buy milk"), &mut store)
            .unwrap();

        assert_eq!(decision, Some(Decision::Proceed));
        assert_eq!(store.counts.len(), 1);
        assert_eq!(store.counts[UNCHANGED_COUNTER_KEY], 1);
    }

    #[test]
    fn test_routing_disabled_has_no_side_effects() {
        let mut store = MemoryStore::default();
        let config = RoutingConfig::new("claude", false);

        let decision = interceptor()
            .handle(&config, &search("how to fix a leaky faucet"), &mut store)
            .unwrap();

        assert!(decision.is_none());
        assert!(store.counts.is_empty());
    }

    #[test]
    fn test_sub_frame_ignored() {
        let mut store = MemoryStore::default();
        let mut event = search("what is rust");
        event.frame_id = 3;

        let decision = interceptor()
            .handle(&RoutingConfig::default(), &event, &mut store)
            .unwrap();
        assert!(decision.is_none());
        assert!(store.counts.is_empty());
    }

    #[test]
    fn test_non_qualifying_urls_ignored() {
        let interceptor = interceptor();
        let config = RoutingConfig::default();
        for url in [
            "https://www.bing.com/search?q=what+is+rust",
            "https://www.google.com/maps?q=what+is+rust",
            "https://notgoogle.com/search?q=what+is+rust",
            "https://www.google.com/search?hl=en",
            "https://www.google.com/search?q=%20%20",
            "https://www.google.com/search?q=",
            "not a url",
            "ftp://google.com/search?q=what+is+rust",
        ] {
            assert!(
                interceptor
                    .decide(&config, &NavigationEvent::top_level(url))
                    .is_none(),
                "{url} should be ignored"
            );
        }
    }

    #[test]
    fn test_plus_decoded_as_space() {
        let decision = interceptor()
            .decide(
                &RoutingConfig::new("chatgpt", true),
                &NavigationEvent::top_level("https://google.com/search?q=explain+rust+traits"),
            )
            .unwrap();
        assert_eq!(
            decision.redirect_url(),
            Some("https://chatgpt.com/?q=explain%20rust%20traits")
        );
        assert_eq!(decision.counter_key(), "chatgpt");
    }

    #[test]
    fn test_unknown_destination_proceeds() {
        let mut store = MemoryStore::default();
        let config = RoutingConfig::new("bing-chat", true);

        let decision = interceptor()
            .handle(&config, &search("what is rust"), &mut store)
            .unwrap();
        assert_eq!(decision, Some(Decision::Proceed));
        assert_eq!(store.counts[UNCHANGED_COUNTER_KEY], 1);
    }

    #[test]
    fn test_store_failure_propagates() {
        let result = interceptor().handle(
            &RoutingConfig::default(),
            &search("what is rust"),
            &mut FailingStore,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_database_store() {
        let mut db = Database::open_in_memory().unwrap();
        let interceptor = interceptor();
        let config = RoutingConfig::new("perplexity", true);

        interceptor
            .handle(&config, &search("pros and cons of rust"), &mut db)
            .unwrap();
        interceptor
            .handle(&config, &search("weather berlin"), &mut db)
            .unwrap();

        assert_eq!(db.get_usage_count("perplexity").unwrap(), 1);
        assert_eq!(db.get_usage_count(UNCHANGED_COUNTER_KEY).unwrap(), 1);
    }

    #[test]
    fn test_custom_search_engine() {
        let interceptor = interceptor().with_search_engine(SearchEngine {
            host: "duckduckgo.com".to_string(),
            path: "/".to_string(),
            query_param: "q".to_string(),
        });
        let decision = interceptor.decide(
            &RoutingConfig::default(),
            &NavigationEvent::top_level("https://duckduckgo.com/?q=what+is+rust"),
        );
        assert!(matches!(decision, Some(Decision::Redirect { .. })));
    }

    #[test]
    fn test_navigation_event_json() {
        let event: NavigationEvent =
            serde_json::from_str(r#"{"frameId":0,"url":"https://google.com/search?q=x","tabId":7}"#)
                .unwrap();
        assert_eq!(event.frame_id, 0);
        assert_eq!(event.tab_id, Some(7));
    }
}
