//! Rule profiles - named, versioned sets of question heuristics.
//!
//! Two profiles ship built in:
//! - `classic`: phrase categories including generic question words anywhere
//!   in the query, numeric values with units, no escape rule.
//! - `strict`: adds the trailing `.` / ` g` escape, recognises contractions
//!   and common misspellings of leading question words, drops the generic
//!   question-word category and the numeric-unit rule.
//!
//! Custom profiles use the same shape and are read from TOML.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::ProfileError;

/// Names accepted by [`RuleProfile::builtin`]
pub const BUILTIN_PROFILES: &[&str] = &["classic", "strict"];

/// Kind of phrase list, in the order categories are usually checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// "explain", "difference between", "tutorial"
    Explanation,
    /// "fix", "debug", "not working"
    ProblemSolving,
    /// "should i", "recommend", "pros and cons"
    OpinionSeeking,
    /// Bare interrogatives matched anywhere in the query
    QuestionWords,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explanation => write!(f, "explanation"),
            Self::ProblemSolving => write!(f, "problem_solving"),
            Self::OpinionSeeking => write!(f, "opinion_seeking"),
            Self::QuestionWords => write!(f, "question_words"),
        }
    }
}

/// Ordered phrase list for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseCategory {
    pub kind: CategoryKind,
    pub phrases: Vec<String>,
}

/// A complete heuristic rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleProfile {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    /// Trailing `.` or whitespace + `g` forces a non-question verdict
    #[serde(default)]
    pub escape_rule: bool,
    /// Words that mark a question when they open the query
    #[serde(default)]
    pub lead_words: Vec<String>,
    /// Digits followed by one of `units` mark a conversion/calculation query
    #[serde(default)]
    pub numeric_units: bool,
    #[serde(default = "default_units")]
    pub units: Vec<String>,
    /// Checked in order after the lead words; kept last so TOML tables trail
    #[serde(default)]
    pub categories: Vec<PhraseCategory>,
}

fn default_version() -> u32 {
    1
}

fn default_units() -> Vec<String> {
    to_strings(&[
        "kg", "km", "mi", "ft", "m", "cm", "lb", "lbs", "g", "mph", "kb", "mb", "gb",
    ])
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

fn explanation_phrases() -> PhraseCategory {
    PhraseCategory {
        kind: CategoryKind::Explanation,
        phrases: to_strings(&[
            "explain",
            "describe",
            "tell me about",
            "help me understand",
            "definition of",
            "meaning of",
            "difference between",
            "compare",
            "vs",
            "versus",
            "or",
            "define",
            "steps to",
            "guide",
            "tutorial",
            "how-to",
            "example of",
            "examples",
            "best way to",
        ]),
    }
}

fn problem_solving_phrases() -> PhraseCategory {
    PhraseCategory {
        kind: CategoryKind::ProblemSolving,
        phrases: to_strings(&[
            "solve",
            "calculate",
            "compute",
            "fix",
            "debug",
            "troubleshoot",
            "help",
            "issue with",
            "problem with",
            "not working",
            "can't",
            "unable to",
        ]),
    }
}

fn opinion_seeking_phrases() -> PhraseCategory {
    PhraseCategory {
        kind: CategoryKind::OpinionSeeking,
        phrases: to_strings(&[
            "should i",
            "recommend",
            "review",
            "opinion",
            "thoughts on",
            "pros and cons",
            "advantages",
            "disadvantages",
            "worth it",
        ]),
    }
}

fn question_words() -> PhraseCategory {
    PhraseCategory {
        kind: CategoryKind::QuestionWords,
        phrases: to_strings(&[
            "what", "when", "where", "why", "who", "how", "which", "whose", "whom",
        ]),
    }
}

impl RuleProfile {
    /// Version 1 heuristics
    #[must_use]
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            version: 1,
            escape_rule: false,
            lead_words: to_strings(&[
                "is", "are", "was", "were", "can", "could", "would", "should",
            ]),
            categories: vec![
                question_words(),
                explanation_phrases(),
                problem_solving_phrases(),
                opinion_seeking_phrases(),
            ],
            numeric_units: true,
            units: default_units(),
        }
    }

    /// Version 2 heuristics: escape rule plus misspelling-tolerant lead words
    #[must_use]
    pub fn strict() -> Self {
        let mut lead_words = to_strings(&[
            // auxiliaries
            "is", "are", "was", "were", "can", "could", "would", "should", "do", "does", "did",
            "will", "has", "have",
            // interrogatives
            "what", "when", "where", "why", "who", "how", "which", "whose", "whom",
        ]);
        lead_words.extend(to_strings(&[
            "what's", "who's", "how's", "where's", "when's", "why's", "isn't", "aren't",
            "wasn't", "weren't", "can't", "couldn't", "wouldn't", "shouldn't", "doesn't",
            "don't", "didn't", "won't",
        ]));
        lead_words.extend(to_strings(&[
            "whats", "whos", "hows", "wheres", "whens", "whys", "isnt", "arent", "wasnt",
            "werent", "cant", "couldnt", "wouldnt", "shouldnt", "doesnt", "dont", "didnt",
            "wont", "waht", "wat", "wht", "hwo", "hw", "wher", "whn", "shoud", "shuold",
            "shold", "cna", "culd", "woud",
        ]));

        Self {
            name: "strict".to_string(),
            version: 2,
            escape_rule: true,
            lead_words,
            categories: vec![
                explanation_phrases(),
                problem_solving_phrases(),
                opinion_seeking_phrases(),
            ],
            numeric_units: false,
            units: default_units(),
        }
    }

    /// Look up a built-in profile by name (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::UnknownProfile`] for names not in [`BUILTIN_PROFILES`]
    pub fn builtin(name: &str) -> Result<Self, ProfileError> {
        match name.trim().to_lowercase().as_str() {
            "classic" => Ok(Self::classic()),
            "strict" => Ok(Self::strict()),
            _ => Err(ProfileError::UnknownProfile(name.to_string())),
        }
    }

    /// Parse a profile from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Parse`] if the TOML is malformed
    pub fn from_toml_str(text: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a profile from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Pick the profile file when one is configured, else the named built-in
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or the name is unknown
    pub fn resolve(name: &str, path: Option<&Path>) -> Result<Self, ProfileError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(name),
        }
    }

    /// Serialize back to TOML (used to scaffold custom profiles)
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_toml_string(&self) -> Result<String, ProfileError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
