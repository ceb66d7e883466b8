pub mod classifier;
pub mod config;
pub mod destination;
pub mod host;
pub mod interceptor;
pub mod protocol;

pub use classifier::{
    CategoryKind, MatchedRule, PhraseCategory, ProfileError, QuestionClassifier, RuleProfile,
    Verdict,
};
pub use config::RoutingConfig;
pub use destination::{Destination, UNCHANGED_COUNTER_KEY};
pub use host::MessageHost;
pub use interceptor::{Decision, Interceptor, NavigationEvent, SearchEngine, UsageStore};
