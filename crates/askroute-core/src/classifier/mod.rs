
mod profile;

pub use profile::{CategoryKind, PhraseCategory, RuleProfile, BUILTIN_PROFILES};

use regex::Regex;
use std::fmt;
use std::path::PathBuf;

/// Errors raised while loading or compiling a rule profile
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("unknown rule profile '{0}' (available: classic, strict)")]
    UnknownProfile(String),
    #[error("failed to read rule profile {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid rule profile: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize rule profile: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid pattern in {rule}: {source}")]
    Pattern { rule: String, source: regex::Error },
}

/// The rule that decided a verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedRule {
    /// Query ends with `?`
    TrailingQuestionMark,
    /// Trailing `.` or ` g` kept the search on the search engine
    Escape,
    /// Query opens with an interrogative or auxiliary word
    LeadWord(String),
    /// A phrase from one of the categories appears as a whole word/phrase
    Phrase {
        category: CategoryKind,
        phrase: String,
    },
    /// A number followed by a unit token
    NumericUnit(String),
    NoMatch,
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrailingQuestionMark => write!(f, "ends with '?'"),
            Self::Escape => write!(f, "escape suffix ('.' or ' g')"),
            Self::LeadWord(word) => write!(f, "leading word '{word}'"),
            Self::Phrase { category, phrase } => write!(f, "{category} phrase '{phrase}'"),
            Self::NumericUnit(text) => write!(f, "numeric value with unit '{text}'"),
            Self::NoMatch => write!(f, "no rule matched"),
        }
    }
}

/// Classification result with the deciding rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub question_like: bool,
    pub rule: MatchedRule,
}

impl Verdict {
    fn question(rule: MatchedRule) -> Self {
        Self {
            question_like: true,
            rule,
        }
    }

    fn lookup(rule: MatchedRule) -> Self {
        Self {
            question_like: false,
            rule,
        }
    }
}

struct CompiledCategory {
    kind: CategoryKind,
    pattern: Regex,
}

/// Question-likelihood classifier compiled from a [`RuleProfile`]
///
/// Order: trailing `?` > escape > lead word > phrase categories > numeric unit.
/// First match wins.
pub struct QuestionClassifier {
    profile_name: String,
    profile_version: u32,
    escape: Option<Regex>,
    lead_words: Option<Regex>,
    categories: Vec<CompiledCategory>,
    numeric_unit: Option<Regex>,
}

impl QuestionClassifier {
    /// Compile every pattern of `profile` once
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Pattern`] if a generated pattern fails to compile
    pub fn new(profile: &RuleProfile) -> Result<Self, ProfileError> {
        let escape = if profile.escape_rule {
            Some(compile("escape rule", r"(?:\.|\sg)$")?)
        } else {
            None
        };

        let lead_words = alternation(&profile.lead_words)
            .map(|alt| compile("lead words", &format!("^{alt}")))
            .transpose()?;

        let mut categories = Vec::with_capacity(profile.categories.len());
        for category in &profile.categories {
            if let Some(alt) = alternation(&category.phrases) {
                categories.push(CompiledCategory {
                    kind: category.kind,
                    pattern: compile(&category.kind.to_string(), &alt)?,
                });
            }
        }

        let numeric_unit = if profile.numeric_units {
            unit_alternation(&profile.units)
                .map(|units| {
                    compile(
                        "numeric units",
                        &format!(r"(\b\d+(?:\.\d+)?\s*(?:{units})\b)"),
                    )
                })
                .transpose()?
        } else {
            None
        };

        log::debug!(
            "Compiled rule profile '{}' v{} ({} categories)",
            profile.name,
            profile.version,
            categories.len()
        );

        Ok(Self {
            profile_name: profile.name.clone(),
            profile_version: profile.version,
            escape,
            lead_words,
            categories,
            numeric_unit,
        })
    }

    /// Name of the profile this classifier was built from
    #[must_use]
    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    #[must_use]
    pub fn profile_version(&self) -> u32 {
        self.profile_version
    }

    /// Whether `query` looks like a question for a conversational assistant
    #[must_use]
    pub fn classify(&self, query: &str) -> bool {
        self.classify_full(query).question_like
    }

    /// Classify and report which rule decided
    #[must_use]
    pub fn classify_full(&self, query: &str) -> Verdict {
        let query = query.trim().to_lowercase();

        if query.ends_with('?') {
            return Verdict::question(MatchedRule::TrailingQuestionMark);
        }

        if self.escape.as_ref().is_some_and(|re| re.is_match(&query)) {
            return Verdict::lookup(MatchedRule::Escape);
        }

        if let Some(word) = self.lead_words.as_ref().and_then(|re| first_capture(re, &query)) {
            return Verdict::question(MatchedRule::LeadWord(word));
        }

        for category in &self.categories {
            if let Some(phrase) = first_capture(&category.pattern, &query) {
                return Verdict::question(MatchedRule::Phrase {
                    category: category.kind,
                    phrase,
                });
            }
        }

        if let Some(text) = self
            .numeric_unit
            .as_ref()
            .and_then(|re| first_capture(re, &query))
        {
            return Verdict::question(MatchedRule::NumericUnit(text));
        }

        Verdict::lookup(MatchedRule::NoMatch)
    }
}

fn compile(rule: &str, pattern: &str) -> Result<Regex, ProfileError> {
    Regex::new(pattern).map_err(|source| ProfileError::Pattern {
        rule: rule.to_string(),
        source,
    })
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Build `(alt1|alt2|...)` where each alternative is escaped and fenced by
/// word boundaries on the sides that start or end with a word character.
/// Returns `None` when no usable entries remain.
fn alternation(entries: &[String]) -> Option<String> {
    let alternatives: Vec<String> = entries
        .iter()
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .map(|entry| bounded(&entry))
        .collect();

    if alternatives.is_empty() {
        None
    } else {
        Some(format!("({})", alternatives.join("|")))
    }
}

/// Units follow digits directly ("10km"), so only the trailing side is fenced.
fn unit_alternation(units: &[String]) -> Option<String> {
    let units: Vec<String> = units
        .iter()
        .map(|unit| unit.trim().to_lowercase())
        .filter(|unit| !unit.is_empty())
        .map(|unit| regex::escape(&unit))
        .collect();

    if units.is_empty() {
        None
    } else {
        Some(units.join("|"))
    }
}

fn bounded(entry: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pattern = String::new();
    if entry.starts_with(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(entry));
    if entry.ends_with(is_word) {
        pattern.push_str(r"\b");
    }
    pattern
}
