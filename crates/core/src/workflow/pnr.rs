//! Reservation reference validation.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::types::WorkflowError;

/// Six characters, Latin or Cyrillic letters and digits. Matched after
/// trimming and uppercasing the raw input.
static REFERENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-ZА-Я0-9]{6}$").expect("reference pattern is valid"));

/// A validated, normalized reservation reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PnrReference(String);

impl PnrReference {
    /// Normalize and validate raw operator input.
    pub fn parse(raw: &str) -> Result<Self, WorkflowError> {
        let normalized = raw.trim().to_uppercase();
        if REFERENCE_PATTERN.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(WorkflowError::InvalidReference(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PnrReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PnrReference {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
