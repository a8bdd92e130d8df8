//! Search configuration types.

use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::attributes::FileAttributes;
use crate::error::EnumError;
use crate::exclusion::PathExclusions;
use crate::pattern::FileSpecPattern;

/// Filtering policy for one enumeration.
///
/// Read-only for the duration of a traversal.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SearchOptions {
    /// File-spec applied to files (directories are not pattern-filtered).
    #[builder(default)]
    #[serde(default)]
    pub pattern: FileSpecPattern,

    /// Descend into subdirectories.
    #[builder(default = "false")]
    #[serde(default)]
    pub recursive: bool,

    /// Yield files only; directories are still descended when recursive.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub files_only: bool,

    /// Include hidden, system and temporary entries.
    #[builder(default = "false")]
    #[serde(default)]
    pub include_hidden: bool,

    /// Directory names or paths pruned from descent.
    #[builder(default)]
    #[serde(default)]
    pub path_exclusions: PathExclusions,

    /// Descend through symbolic links to directories.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Deepest level yielded; the root's children are at depth 1
    /// (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl SearchOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        check_max_depth(self.max_depth.flatten())
    }
}

fn check_max_depth(max_depth: Option<u32>) -> Result<(), String> {
    if max_depth == Some(0) {
        return Err("max_depth must be at least 1".to_string());
    }
    Ok(())
}

impl From<SearchOptionsBuilderError> for EnumError {
    fn from(err: SearchOptionsBuilderError) -> Self {
        Self::InvalidConfig {
            message: err.to_string(),
        }
    }
}

impl SearchOptions {
    /// Create a new search options builder.
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }

    /// Non-recursive, files-only search for a spec.
    pub fn new(pattern: impl Into<FileSpecPattern>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Check the invariants the builder enforces.
    ///
    /// Options that were deserialized or mutated in place skip the builder,
    /// so the enumerator re-checks them before walking.
    pub fn validate(&self) -> Result<(), EnumError> {
        check_max_depth(self.max_depth).map_err(|message| EnumError::InvalidConfig { message })
    }

    /// Check if entries with these attributes are dropped as hidden.
    pub fn should_skip_hidden(&self, attributes: FileAttributes) -> bool {
        !self.include_hidden && attributes.is_concealed()
    }

    /// Check if a directory may be descended into.
    pub fn should_descend(&self, name: &str, path: &Path, attributes: FileAttributes) -> bool {
        self.recursive
            && !self.should_skip_hidden(attributes)
            && !self.path_exclusions.is_excluded(name, path)
    }

    /// Check if a non-directory entry passes the filter.
    ///
    /// A wildcard-all pattern accepts every name, blank ones included. A
    /// blank name never matches a narrower pattern.
    pub fn accepts_file(&self, name: &str, attributes: FileAttributes) -> bool {
        if self.should_skip_hidden(attributes) {
            return false;
        }
        if self.pattern.is_wildcard_all() {
            return true;
        }
        match self.pattern.matches(name) {
            Ok(matched) => matched,
            Err(err) => {
                warn!(name, pattern = %self.pattern, error = %err, "entry name cannot be matched");
                false
            }
        }
    }

    /// Spec to hand to the listing source, if it can filter for us.
    ///
    /// Only non-recursive single-alternative searches push the spec down:
    /// a recursive walk has to see every subdirectory, and sources cannot
    /// express alternatives.
    pub fn listing_hint(&self) -> Option<&FileSpecPattern> {
        if self.recursive || self.pattern.is_wildcard_all() || self.pattern.has_multiple_sub_patterns()
        {
            None
        } else {
            Some(&self.pattern)
        }
    }

    /// Check if a directory found at `depth` may be descended into.
    pub fn within_depth(&self, depth: u32) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            pattern: FileSpecPattern::all(),
            recursive: false,
            files_only: true,
            include_hidden: false,
            path_exclusions: PathExclusions::default(),
            follow_symlinks: false,
            max_depth: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert!(options.pattern.is_wildcard_all());
        assert!(!options.recursive);
        assert!(options.files_only);
        assert!(!options.include_hidden);
        assert!(options.path_exclusions.is_empty());
        assert!(!options.follow_symlinks);
        assert_eq!(options.max_depth, None);
    }

    #[test]
    fn test_builder_matches_defaults() {
        let built = SearchOptions::builder().build().unwrap();
        assert_eq!(built, SearchOptions::default());
    }

    #[test]
    fn test_builder() {
        let options = SearchOptions::builder()
            .pattern("*.cs;*.xaml")
            .recursive(true)
            .files_only(false)
            .path_exclusions(PathExclusions::new(["bin", "obj"]))
            .max_depth(4u32)
            .build()
            .unwrap();

        assert!(options.pattern.has_multiple_sub_patterns());
        assert!(options.recursive);
        assert!(!options.files_only);
        assert_eq!(options.path_exclusions.len(), 2);
        assert_eq!(options.max_depth, Some(4));
    }

    #[test]
    fn test_builder_rejects_zero_depth() {
        let result = SearchOptions::builder().max_depth(0u32).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_should_skip_hidden() {
        let mut options = SearchOptions::default();
        assert!(options.should_skip_hidden(FileAttributes::HIDDEN));
        assert!(options.should_skip_hidden(FileAttributes::SYSTEM | FileAttributes::READONLY));
        assert!(!options.should_skip_hidden(FileAttributes::NORMAL));

        options.include_hidden = true;
        assert!(!options.should_skip_hidden(FileAttributes::HIDDEN));
    }

    #[test]
    fn test_should_descend() {
        let mut options = SearchOptions::builder()
            .path_exclusions(PathExclusions::new(["skip"]))
            .build()
            .unwrap();
        let dir = FileAttributes::DIRECTORY;

        assert!(!options.should_descend("src", Path::new("/r/src"), dir));

        options.recursive = true;
        assert!(options.should_descend("src", Path::new("/r/src"), dir));
        assert!(!options.should_descend("skip", Path::new("/r/skip"), dir));
        assert!(!options.should_descend(".git", Path::new("/r/.git"), dir | FileAttributes::HIDDEN));
    }

    #[test]
    fn test_accepts_blank_names_only_with_wildcard_all() {
        let options = SearchOptions::default();
        assert!(options.accepts_file(" ", FileAttributes::NORMAL));
        assert!(options.accepts_file("", FileAttributes::NORMAL));

        let narrowed = SearchOptions::new("*.txt");
        assert!(!narrowed.accepts_file(" ", FileAttributes::NORMAL));
        assert!(narrowed.accepts_file("a.txt", FileAttributes::NORMAL));
    }

    #[test]
    fn test_validate_catches_deserialized_zero_depth() {
        let options: SearchOptions = serde_json::from_str(r#"{"max_depth": 0}"#).unwrap();
        assert!(matches!(
            options.validate(),
            Err(EnumError::InvalidConfig { .. })
        ));
        assert!(SearchOptions::default().validate().is_ok());
    }

    #[test]
    fn test_builder_error_converts_to_invalid_config() {
        fn build() -> Result<SearchOptions, EnumError> {
            Ok(SearchOptions::builder().max_depth(0u32).build()?)
        }
        match build() {
            Err(EnumError::InvalidConfig { message }) => assert!(message.contains("max_depth")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_listing_hint() {
        assert!(SearchOptions::new("*.cs").listing_hint().is_some());
        assert!(SearchOptions::new("*").listing_hint().is_none());
        assert!(SearchOptions::new("*.cs,*.xaml").listing_hint().is_none());

        let mut recursive = SearchOptions::new("*.cs");
        recursive.recursive = true;
        assert!(recursive.listing_hint().is_none());
    }

    #[test]
    fn test_within_depth() {
        let mut options = SearchOptions::default();
        assert!(options.within_depth(1000));

        options.max_depth = Some(2);
        assert!(options.within_depth(1));
        assert!(!options.within_depth(2));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let options: SearchOptions =
            serde_json::from_str(r#"{"pattern": "*.RS", "recursive": true}"#).unwrap();
        assert_eq!(options.pattern.as_str(), "*.rs");
        assert!(options.recursive);
        assert!(options.files_only);
        assert!(!options.include_hidden);
    }
}
