//! Dry-run the navigation interceptor from the command line

use anyhow::Result;
use askroute_core::{
    Decision, Interceptor, NavigationEvent, QuestionClassifier, RoutingConfig, RuleProfile,
};
use askroute_storage::Database;
use std::path::{Path, PathBuf};

fn describe(decision: Option<&Decision>) -> String {
    match decision {
        None => "ignored (routing off, sub-frame, or not a search results URL)".to_string(),
        Some(Decision::Proceed) => format!(
            "proceed to search engine [counter: {}]",
            Decision::Proceed.counter_key()
        ),
        Some(Decision::Redirect { destination, url }) => {
            format!("redirect to {destination}: {url} [counter: {}]", destination.id())
        }
    }
}

pub fn route_command(
    db_path: Option<PathBuf>,
    url: &str,
    frame_id: i64,
    record: bool,
) -> Result<()> {
    let mut db = Database::new(db_path)?;
    let settings = db.get_settings()?;
    let profile = RuleProfile::resolve(
        &settings.rule_profile,
        settings.profile_path.as_deref().map(Path::new),
    )?;
    let config = RoutingConfig::from(&settings);
    let interceptor = Interceptor::new(QuestionClassifier::new(&profile)?);

    let event = NavigationEvent {
        frame_id,
        url: url.to_string(),
        tab_id: None,
    };

    let decision = if record {
        interceptor.handle(&config, &event, &mut db)?
    } else {
        interceptor.decide(&config, &event)
    };

    println!("{}", describe(decision.as_ref()));
    if record && decision.is_some() {
        println!("Usage counter updated.");
    }
    Ok(())
}
