//! Expiration date candidate extraction
//!
//! Scans recognized text for the first date-shaped substring. Matching is
//! purely lexical: `13/45/9999` is a candidate even though no such day exists.

use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// `D{1,2} SEP D{1,2} SEP D{2,4}` or `D{2,4} SEP D{1,2} SEP D{1,2}`, SEP is `/` or `-`.
/// ASCII digits and ASCII word boundaries only.
const DATE_PATTERN: &str = r"(?-u:\b)(?:[0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{2,4}|[0-9]{2,4}[/-][0-9]{1,2}[/-][0-9]{1,2})(?-u:\b)";

/// Rendered in place of a date when the text has none
pub const NOT_FOUND: &str = "not found";

fn date_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(DATE_PATTERN).expect("date pattern is valid"))
}

/// Return the leftmost date-shaped substring of `text`, verbatim.
pub fn find_date_candidate(text: &str) -> Option<&str> {
    date_regex().find(text).map(|m| m.as_str())
}

/// Outcome of the date scan. Absence is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpirationDate {
    Found(String),
    NotFound,
}

impl ExpirationDate {
    pub fn extract(text: &str) -> Self {
        match find_date_candidate(text) {
            Some(candidate) => Self::Found(candidate.to_string()),
            None => Self::NotFound,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Found(date) => date,
            Self::NotFound => NOT_FOUND,
        }
    }
}

impl fmt::Display for ExpirationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExpirationDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
