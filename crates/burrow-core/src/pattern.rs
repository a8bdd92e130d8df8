//! Windows-style file specifications (`*.cs`, `ABC?.BAT`, `*.cs;*.xaml`).
//!
//! This is not a general glob engine. It recognizes the handful of shapes
//! people actually type into a file dialog:
//!
//! | shape            | example    | rule                                      |
//! |------------------|------------|-------------------------------------------|
//! | all              | `*`, `*.*` | everything                                |
//! | alternatives     | `a,b`      | any alternative matches                   |
//! | trailing star    | `ABC*`     | prefix                                    |
//! | star before ext  | `Z*.EXE`   | prefix, then `.ext` suffix                |
//! | `?` before ext   | `ABC?.BAT` | prefix, one character, then `.ext` suffix |
//! | anything else    | `a.txt`    | exact (case-insensitive)                  |
//!
//! A `?` anywhere other than right before the last dot gets no special
//! treatment and the pattern is compared literally.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EnumError;

const ALTERNATIVE_SEPARATOR: char = ',';

/// A normalized file specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FileSpecPattern {
    spec: String,
    wildcard_all: bool,
    multiple: bool,
}

impl FileSpecPattern {
    /// Parse a spec string. An empty spec means "match everything".
    pub fn new(spec: impl AsRef<str>) -> Self {
        let spec = normalize_spec(spec.as_ref());
        let wildcard_all = is_wildcard_all(&spec);
        let multiple = spec.contains(ALTERNATIVE_SEPARATOR);
        Self {
            spec,
            wildcard_all,
            multiple,
        }
    }

    /// The match-everything pattern.
    pub fn all() -> Self {
        Self::new("*")
    }

    /// The normalized spec text.
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    /// True iff the spec is exactly `*` or `*.*`.
    pub fn is_wildcard_all(&self) -> bool {
        self.wildcard_all
    }

    /// True iff the spec holds comma-separated alternatives.
    pub fn has_multiple_sub_patterns(&self) -> bool {
        self.multiple
    }

    /// Test a candidate base name against this pattern.
    ///
    /// Returns [`EnumError::InvalidArgument`] for an empty or
    /// whitespace-only candidate.
    pub fn matches(&self, candidate: &str) -> Result<bool, EnumError> {
        if candidate.trim().is_empty() {
            return Err(EnumError::invalid_argument(
                "candidate name cannot be empty",
            ));
        }
        if self.wildcard_all {
            return Ok(true);
        }

        let candidate = candidate.to_lowercase();
        if self.multiple {
            return Ok(self
                .spec
                .split(ALTERNATIVE_SEPARATOR)
                .map(str::trim)
                .filter(|alt| !alt.is_empty())
                .any(|alt| matches_single(alt, &candidate)));
        }
        Ok(matches_single(&self.spec, &candidate))
    }
}

impl Default for FileSpecPattern {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for FileSpecPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

impl FromStr for FileSpecPattern {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for FileSpecPattern {
    fn from(spec: &str) -> Self {
        Self::new(spec)
    }
}

impl From<String> for FileSpecPattern {
    fn from(spec: String) -> Self {
        Self::new(spec)
    }
}

impl From<FileSpecPattern> for String {
    fn from(pattern: FileSpecPattern) -> Self {
        pattern.spec
    }
}

fn normalize_spec(spec: &str) -> String {
    let spec = spec.trim();
    if spec.is_empty() {
        return "*".to_string();
    }
    spec.to_lowercase().replace(';', ",")
}

fn is_wildcard_all(spec: &str) -> bool {
    spec == "*" || spec == "*.*"
}

/// Match one alternative. Both sides are already lower-cased.
fn matches_single(pattern: &str, candidate: &str) -> bool {
    if is_wildcard_all(pattern) {
        return true;
    }

    let stars = pattern.matches('*').count();
    let last_dot = pattern.rfind('.');

    // ABC*
    if stars == 1 && pattern.ends_with('*') {
        return candidate.starts_with(&pattern[..pattern.len() - 1]);
    }

    // Z*.EXE
    if stars == 1 {
        if let (Some(star), Some(dot)) = (pattern.find('*'), last_dot) {
            if star + 1 == dot {
                let (head, tail) = (&pattern[..star], &pattern[dot..]);
                return candidate.contains('.')
                    && candidate.starts_with(head)
                    && candidate.ends_with(tail);
            }
        }
    }

    // ABC?.BAT
    if pattern.matches('?').count() == 1 {
        if let (Some(question), Some(dot)) = (pattern.find('?'), last_dot) {
            if question + 1 == dot {
                let (head, tail) = (&pattern[..question], &pattern[dot..]);
                return candidate.chars().count() == pattern.chars().count()
                    && candidate.starts_with(head)
                    && candidate.ends_with(tail);
            }
        }
    }

    pattern == candidate
}
