//! Analysis over enumerated records for burrow.
//!
//! - **Duplicate detection** - find files with identical content using the
//!   records' lazy BLAKE3 hashes
//!
//! # Duplicate Detection
//!
//! Files are grouped by size first; only size collisions are hashed, in
//! parallel.
//!
//! ```rust,no_run
//! use burrow_analyze::DuplicateFinder;
//! use burrow_scan::{DirectoryEnumerator, SearchOptions};
//!
//! let options = SearchOptions::builder().recursive(true).build().unwrap();
//! let records = DirectoryEnumerator::new("/path/to/scan", options).unwrap();
//!
//! let report = DuplicateFinder::new().find(records);
//!
//! println!("Found {} duplicate groups", report.group_count());
//! println!("Wasted space: {} bytes", report.total_wasted_space);
//! ```

mod duplicates;

pub use duplicates::{
    DuplicateConfig, DuplicateConfigBuilder, DuplicateConfigBuilderError, DuplicateFinder,
    DuplicateGroup, DuplicateReport,
};

// Re-export core types
pub use burrow_core::{ContentHash, FileRecord};
