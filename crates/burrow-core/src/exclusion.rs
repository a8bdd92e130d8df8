//! Path exclusions pruning directories from recursive descent.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// How a path-shaped exclusion is compared against a candidate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionMatch {
    /// The normalized paths must be equal.
    #[default]
    Exact,
    /// The candidate must end with the exclusion on a component boundary.
    Suffix,
}

/// A list of directory names or paths to prune.
///
/// An entry without a path separator (`node_modules`) is compared against
/// the entry's base name. An entry with separators (`/srv/cache`,
/// `C:\Temp`) is compared against the entry's full path. All comparisons go
/// through [`normalize_path`] and are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExclusionsRepr")]
pub struct PathExclusions {
    entries: Vec<String>,
    mode: ExclusionMatch,
}

/// Deserialized form, normalized on the way in.
#[derive(Deserialize)]
struct ExclusionsRepr {
    #[serde(default)]
    entries: Vec<String>,
    #[serde(default)]
    mode: ExclusionMatch,
}

impl From<ExclusionsRepr> for PathExclusions {
    fn from(repr: ExclusionsRepr) -> Self {
        Self::new(repr.entries).with_mode(repr.mode)
    }
}

impl PathExclusions {
    /// Create exclusions compared with [`ExclusionMatch::Exact`].
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exclusions = Self::default();
        for entry in entries {
            exclusions.push(entry);
        }
        exclusions
    }

    /// Change the path comparison mode.
    pub fn with_mode(mut self, mode: ExclusionMatch) -> Self {
        self.mode = mode;
        self
    }

    /// Add an exclusion. Blank entries are ignored.
    pub fn push(&mut self, entry: impl AsRef<str>) {
        let normalized = normalize_path(entry.as_ref());
        if !normalized.is_empty() && !self.entries.contains(&normalized) {
            self.entries.push(normalized);
        }
    }

    /// The comparison mode.
    pub fn mode(&self) -> ExclusionMatch {
        self.mode
    }

    /// Number of exclusions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no exclusions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if an entry with this base name and full path is excluded.
    pub fn is_excluded(&self, name: &str, path: &Path) -> bool {
        if self.entries.is_empty() {
            return false;
        }

        let name = name.to_lowercase();
        let path = normalize_path(&path.to_string_lossy());
        self.entries.iter().any(|entry| {
            if !entry.contains('/') {
                return *entry == name;
            }
            match self.mode {
                ExclusionMatch::Exact => *entry == path,
                ExclusionMatch::Suffix => is_component_suffix(&path, entry),
            }
        })
    }
}

impl<S: AsRef<str>> FromIterator<S> for PathExclusions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Normalize a path for comparison.
///
/// Backslashes become `/`, a leading drive letter (`C:`) is dropped, runs of
/// separators collapse, trailing separators are stripped and the result is
/// lower-cased. The root itself normalizes to `/`.
pub fn normalize_path(path: &str) -> String {
    let mut path = path.trim().replace('\\', "/");

    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        path.replace_range(..2, "");
    }

    let rooted = path.starts_with('/');
    let joined = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    let normalized = if rooted {
        format!("/{joined}")
    } else {
        joined
    };
    normalized.to_lowercase()
}

fn is_component_suffix(path: &str, suffix: &str) -> bool {
    let suffix = suffix.trim_start_matches('/');
    if suffix.is_empty() {
        return false;
    }
    match path.strip_suffix(suffix) {
        Some(rest) => rest.is_empty() || rest.ends_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(r"C:\Users\Me\"), "/users/me");
        assert_eq!(normalize_path("/srv//Cache/"), "/srv/cache");
        assert_eq!(normalize_path("relative/Dir"), "relative/dir");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("d:"), "");
    }

    #[test]
    fn test_name_exclusion() {
        let exclusions = PathExclusions::new(["node_modules", "TARGET"]);
        assert!(exclusions.is_excluded("node_modules", Path::new("/a/node_modules")));
        assert!(exclusions.is_excluded("target", Path::new("/a/target")));
        assert!(!exclusions.is_excluded("src", Path::new("/a/src")));
    }

    #[test]
    fn test_exact_path_exclusion_ignores_drive_and_trailing_separator() {
        let exclusions = PathExclusions::new([r"C:\work\Build\"]);
        assert!(exclusions.is_excluded("build", Path::new("/work/build")));
        assert!(!exclusions.is_excluded("build", Path::new("/other/work/build")));
        assert!(!exclusions.is_excluded("sub", Path::new("/work/build/sub")));
    }

    #[test]
    fn test_suffix_path_exclusion() {
        let exclusions =
            PathExclusions::new(["work/build"]).with_mode(ExclusionMatch::Suffix);
        assert!(exclusions.is_excluded("build", Path::new("/home/me/work/build")));
        assert!(exclusions.is_excluded("build", Path::new("/work/build")));
        assert!(!exclusions.is_excluded("build", Path::new("/home/me/homework/build")));
    }

    #[test]
    fn test_push_skips_blank_and_duplicates() {
        let mut exclusions = PathExclusions::default();
        exclusions.push("  ");
        exclusions.push("cache");
        exclusions.push("CACHE");
        assert_eq!(exclusions.len(), 1);
    }

    #[test]
    fn test_deserialize_normalizes_entries() {
        let exclusions: PathExclusions =
            serde_json::from_str(r#"{"entries": ["C:\\Data\\Tmp\\"], "mode": "suffix"}"#)
                .unwrap();
        assert_eq!(exclusions.mode(), ExclusionMatch::Suffix);
        assert!(exclusions.is_excluded("tmp", Path::new("/mnt/data/tmp")));
    }
}
