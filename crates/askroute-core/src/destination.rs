use serde::{Deserialize, Serialize};
use std::fmt;

/// Usage-counter key for navigations left on the search engine
pub const UNCHANGED_COUNTER_KEY: &str = "unchanged";

/// Conversational answer services a query can be routed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    #[default]
    Claude,
    ChatGpt,
    Perplexity,
    Gemini,
    Meta,
}

impl Destination {
    pub const ALL: [Self; 5] = [
        Self::Claude,
        Self::ChatGpt,
        Self::Perplexity,
        Self::Gemini,
        Self::Meta,
    ];

    /// Stable identifier used in settings, messages and counters
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::ChatGpt => "chatgpt",
            Self::Perplexity => "perplexity",
            Self::Gemini => "gemini",
            Self::Meta => "meta",
        }
    }

    /// Base URL the percent-encoded query is appended to
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Claude => "https://claude.ai/new?q=",
            Self::ChatGpt => "https://chatgpt.com/?q=",
            Self::Perplexity => "https://www.perplexity.ai/?q=",
            Self::Gemini => "https://gemini.google.com/app?q=",
            Self::Meta => "https://chat.meta.com/chat?q=",
        }
    }

    /// Full redirect target for `query`
    #[must_use]
    pub fn redirect_url(self, query: &str) -> String {
        format!("{}{}", self.endpoint(), urlencoding::encode(query))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.id() == wanted)
            .ok_or_else(|| format!("Unknown destination: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_destination() {
        assert_eq!("claude".parse::<Destination>(), Ok(Destination::Claude));
        assert_eq!(" ChatGPT ".parse::<Destination>(), Ok(Destination::ChatGpt));
        assert!("bing".parse::<Destination>().is_err());
    }

    #[test]
    fn test_ids_roundtrip_through_parse() {
        for destination in Destination::ALL {
            assert_eq!(destination.id().parse::<Destination>(), Ok(destination));
        }
    }

    #[test]
    fn test_redirect_url_percent_encodes() {
        assert_eq!(
            Destination::Claude.redirect_url("how to fix a leaky faucet"),
            "https://claude.ai/new?q=how%20to%20fix%20a%20leaky%20faucet"
        );
        assert_eq!(
            Destination::Perplexity.redirect_url("c++ & rust?"),
            "https://www.perplexity.ai/?q=c%2B%2B%20%26%20rust%3F"
        );
    }

    #[test]
    fn test_serde_uses_ids() {
        assert_eq!(
            serde_json::to_string(&Destination::ChatGpt).unwrap(),
            "\"chatgpt\""
        );
        let parsed: Destination = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(parsed, Destination::Gemini);
    }

    #[test]
    fn test_default_is_claude() {
        assert_eq!(Destination::default(), Destination::Claude);
        assert_eq!(Destination::default().id(), askroute_storage::DEFAULT_DESTINATION);
    }
}
