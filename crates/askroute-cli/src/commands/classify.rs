//! Query classification and rule profile commands

use anyhow::Result;
use askroute_core::{classifier::BUILTIN_PROFILES, QuestionClassifier, RuleProfile};
use askroute_storage::Database;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Version")]
    version: u32,
    #[tabled(rename = "Escape rule")]
    escape_rule: bool,
    #[tabled(rename = "Numeric units")]
    numeric_units: bool,
    #[tabled(rename = "Lead words")]
    lead_words: usize,
    #[tabled(rename = "Categories")]
    categories: String,
}

impl From<&RuleProfile> for ProfileRow {
    fn from(profile: &RuleProfile) -> Self {
        Self {
            name: profile.name.clone(),
            version: profile.version,
            escape_rule: profile.escape_rule,
            numeric_units: profile.numeric_units,
            lead_words: profile.lead_words.len(),
            categories: profile
                .categories
                .iter()
                .map(|c| c.kind.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Pick the profile for a one-off command: explicit file, explicit name, or stored settings
pub fn select_profile(
    db_path: Option<PathBuf>,
    profile: Option<&str>,
    profile_file: Option<&Path>,
) -> Result<RuleProfile> {
    if let Some(path) = profile_file {
        return Ok(RuleProfile::from_file(path)?);
    }
    if let Some(name) = profile {
        return Ok(RuleProfile::builtin(name)?);
    }

    let settings = Database::new(db_path)?.get_settings()?;
    Ok(RuleProfile::resolve(
        &settings.rule_profile,
        settings.profile_path.as_deref().map(Path::new),
    )?)
}

pub fn classify_command(
    db_path: Option<PathBuf>,
    query: &str,
    profile: Option<&str>,
    profile_file: Option<&Path>,
    explain: bool,
) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("Query is empty");
    }

    let profile = select_profile(db_path, profile, profile_file)?;
    let classifier = QuestionClassifier::new(&profile)?;
    let verdict = classifier.classify_full(query);

    let label = if verdict.question_like {
        "question"
    } else {
        "lookup"
    };

    if explain {
        println!("Query:   {query}");
        println!(
            "Profile: {} v{}",
            classifier.profile_name(),
            classifier.profile_version()
        );
        println!("Verdict: {label}");
        println!("Rule:    {}", verdict.rule);
    } else {
        println!("{label}");
    }

    Ok(())
}

pub fn profiles_command(show: Option<&str>) -> Result<()> {
    if let Some(name) = show {
        print!("{}", RuleProfile::builtin(name)?.to_toml_string()?);
        return Ok(());
    }

    let rows = BUILTIN_PROFILES
        .iter()
        .map(|name| RuleProfile::builtin(name).map(|p| ProfileRow::from(&p)))
        .collect::<Result<Vec<_>, _>>()?;

    println!("{}", Table::new(rows));
    println!("\nUse `askroute config set ruleProfile <name>` to switch profiles.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_row() {
        let row = ProfileRow::from(&RuleProfile::strict());
        assert_eq!(row.name, "strict");
        assert!(row.escape_rule);
        assert!(!row.numeric_units);
        assert_eq!(
            row.categories,
            "explanation, problem_solving, opinion_seeking"
        );
    }

    #[test]
    fn test_select_profile_prefers_explicit_name() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("askroute.db");

        let profile = select_profile(Some(db_path.clone()), Some("strict"), None).unwrap();
        assert_eq!(profile.name, "strict");

        let stored = select_profile(Some(db_path), None, None).unwrap();
        assert_eq!(stored.name, "classic");
    }

    #[test]
    fn test_classify_rejects_empty_query() {
        assert!(classify_command(None, "   ", Some("classic"), None, false).is_err());
    }
}
