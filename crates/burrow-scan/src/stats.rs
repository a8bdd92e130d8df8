//! Enumeration statistics.

use std::time::{Duration, Instant};

/// Running counters for one enumeration.
#[derive(Debug, Clone)]
pub struct EnumStats {
    /// Files yielded so far.
    pub files_yielded: u64,
    /// Directory records yielded so far.
    pub dirs_yielded: u64,
    /// Directory listings successfully opened (root included).
    pub dirs_entered: u64,
    /// Sentinel records yielded for directories or entries that could not be read.
    pub access_denied: u64,
    /// Entries dropped by the hidden, pattern or exclusion filters.
    pub entries_skipped: u64,
    /// Listing errors for individual entries (logged and skipped).
    pub entry_errors: u64,
    /// Total size of yielded files.
    pub bytes_yielded: u64,
    started: Instant,
}

impl EnumStats {
    /// Create empty counters, starting the clock now.
    pub fn new() -> Self {
        Self {
            files_yielded: 0,
            dirs_yielded: 0,
            dirs_entered: 0,
            access_denied: 0,
            entries_skipped: 0,
            entry_errors: 0,
            bytes_yielded: 0,
            started: Instant::now(),
        }
    }

    pub(crate) fn record_file(&mut self, size: u64) {
        self.files_yielded += 1;
        self.bytes_yielded += size;
    }

    pub(crate) fn record_dir(&mut self) {
        self.dirs_yielded += 1;
    }

    /// Get total records yielded (files + dirs + sentinels).
    pub fn total_yielded(&self) -> u64 {
        self.files_yielded + self.dirs_yielded + self.access_denied
    }

    /// Time since the enumerator was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for EnumStats {
    fn default() -> Self {
        Self::new()
    }
}
