//! burrow - streaming directory enumeration with file-spec matching.
//!
//! This facade re-exports the workspace crates:
//!
//! - [`burrow_core`] - records, attributes, patterns, exclusions, options
//! - [`burrow_scan`] - the pull-based [`DirectoryEnumerator`]
//! - [`burrow_analyze`] - duplicate detection over enumerated records
//!
//! ```rust,no_run
//! use burrow::{SearchOptions, enumerate};
//!
//! let options = SearchOptions::builder()
//!     .pattern("*.rs")
//!     .recursive(true)
//!     .build()
//!     .unwrap();
//!
//! for record in enumerate(".", options).unwrap() {
//!     println!("{}", record.path.display());
//! }
//! ```

pub use burrow_analyze::{
    DuplicateConfig, DuplicateConfigBuilder, DuplicateFinder, DuplicateGroup, DuplicateReport,
};
pub use burrow_core::{
    ContentHash, EnumError, ExclusionMatch, FileAttributes, FileRecord, FileSpecPattern,
    PathExclusions, SearchOptions, SearchOptionsBuilder, Timestamps, hash_file, normalize_path,
};
pub use burrow_scan::{
    DirKey, DirectoryEnumerator, DirectorySource, EnumStats, RawEntry, StdDirectorySource,
    enumerate,
};

pub use burrow_analyze;
pub use burrow_core;
pub use burrow_scan;
