//! Directory identity tracking for symlink cycle detection.

use std::collections::HashSet;
use std::path::PathBuf;

/// Identity of a directory, independent of the path used to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DirKey {
    /// Device and inode number (Unix).
    Inode { device: u64, inode: u64 },
    /// Canonical path, where the platform has no stable inode.
    Canonical(PathBuf),
}

/// Tracks directories already descended into.
///
/// Only consulted when symlinks are followed; without links the tree is
/// acyclic and nothing needs tracking.
#[derive(Debug, Default)]
pub struct VisitedDirs {
    seen: HashSet<DirKey>,
}

impl VisitedDirs {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a directory. Returns `true` if this is the first time seeing it.
    pub fn track(&mut self, key: DirKey) -> bool {
        self.seen.insert(key)
    }
}
