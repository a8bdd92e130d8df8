//! Duplicate file detection over enumerated records.
//!
//! Uses a two-phase algorithm:
//! 1. Group files by size (no I/O)
//! 2. Hash size-matched files in parallel and group by digest
//!
//! Hashing goes through each record's cached content hash, so records that
//! could not be read are dropped rather than retried.

use std::collections::HashMap;
use std::path::PathBuf;

use derive_builder::Builder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use burrow_core::{ContentHash, FileRecord};

/// Configuration for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct DuplicateConfig {
    /// Minimum file size to consider (empty files are skipped by default).
    #[builder(default = "1")]
    pub min_size: u64,

    /// Maximum file size to consider.
    #[builder(default = "u64::MAX")]
    pub max_size: u64,

    /// Maximum number of groups to return (0 = unlimited).
    #[builder(default = "0")]
    pub max_groups: usize,
}

impl DuplicateConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if min > max {
                return Err(format!("min_size {min} exceeds max_size {max}"));
            }
        }
        Ok(())
    }
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            min_size: 1,
            max_size: u64::MAX,
            max_groups: 0,
        }
    }
}

impl DuplicateConfig {
    /// Create a new config builder.
    pub fn builder() -> DuplicateConfigBuilder {
        DuplicateConfigBuilder::default()
    }

    fn admits(&self, record: &FileRecord) -> bool {
        !record.is_dir()
            && !record.attributes.is_reparse_point()
            && !record.access_denied
            && record.size >= self.min_size
            && record.size <= self.max_size
    }
}

/// A group of files sharing the same content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Content hash shared by all files in this group.
    pub hash: ContentHash,

    /// Size of each file in bytes.
    pub size: u64,

    /// Paths to all duplicate files, sorted.
    pub paths: Vec<PathBuf>,

    /// Wasted space: size * (count - 1).
    pub wasted_bytes: u64,
}

impl DuplicateGroup {
    /// Get the number of duplicate files.
    pub fn count(&self) -> usize {
        self.paths.len()
    }

    /// Number of files that could go if one copy is kept.
    pub fn deletable_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

/// Results from duplicate analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Groups of duplicate files, sorted by wasted space descending.
    pub groups: Vec<DuplicateGroup>,

    /// Total size of all duplicate files.
    pub total_duplicate_size: u64,

    /// Total wasted space (could be reclaimed).
    pub total_wasted_space: u64,

    /// Number of files that passed the size filter.
    pub files_analyzed: u64,

    /// Number of files that were actually hashed.
    pub files_hashed: u64,

    /// Number of size-matched files whose content could not be read.
    pub files_unreadable: u64,

    /// Number of files that have duplicates.
    pub files_with_duplicates: u64,
}

impl DuplicateReport {
    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Number of duplicate groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Duplicate file finder.
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: DuplicateConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new duplicate finder with custom config.
    pub fn with_config(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &DuplicateConfig {
        &self.config
    }

    /// Find duplicates among enumerated records.
    ///
    /// Directories, access-denied records and files outside the configured
    /// size range are ignored.
    pub fn find(&self, records: impl IntoIterator<Item = FileRecord>) -> DuplicateReport {
        let mut files_analyzed = 0u64;
        let mut by_size: HashMap<u64, Vec<FileRecord>> = HashMap::new();
        for record in records {
            if self.config.admits(&record) {
                files_analyzed += 1;
                by_size.entry(record.size).or_default().push(record);
            }
        }

        let mut candidates: Vec<FileRecord> = by_size
            .into_values()
            .filter(|group| group.len() > 1)
            .flatten()
            .collect();
        let files_hashed = candidates.len() as u64;
        debug!(files_analyzed, files_hashed, "hashing size-matched files");

        candidates.par_iter_mut().for_each(|record| {
            record.content_hash();
        });

        let mut files_unreadable = 0u64;
        let mut by_hash: HashMap<(u64, ContentHash), Vec<PathBuf>> = HashMap::new();
        for record in candidates {
            match record.content_hash().copied() {
                Some(hash) => by_hash
                    .entry((record.size, hash))
                    .or_default()
                    .push(record.path),
                None => files_unreadable += 1,
            }
        }

        let mut groups: Vec<DuplicateGroup> = by_hash
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|((size, hash), mut paths)| {
                paths.sort();
                DuplicateGroup {
                    hash,
                    size,
                    wasted_bytes: size * (paths.len() as u64 - 1),
                    paths,
                }
            })
            .collect();

        groups.sort_by(|a, b| {
            b.wasted_bytes
                .cmp(&a.wasted_bytes)
                .then_with(|| a.paths.cmp(&b.paths))
        });
        if self.config.max_groups > 0 {
            groups.truncate(self.config.max_groups);
        }

        let total_duplicate_size = groups.iter().map(|g| g.size * g.count() as u64).sum();
        let total_wasted_space = groups.iter().map(|g| g.wasted_bytes).sum();
        let files_with_duplicates = groups.iter().map(|g| g.count() as u64).sum();

        debug!(
            groups = groups.len(),
            wasted = total_wasted_space,
            unreadable = files_unreadable,
            "duplicate search finished"
        );

        DuplicateReport {
            groups,
            total_duplicate_size,
            total_wasted_space,
            files_analyzed,
            files_hashed,
            files_unreadable,
            files_with_duplicates,
        }
    }
}
