//! Streaming directory enumeration for burrow.
//!
//! This crate walks a directory tree lazily, one entry per pull, and yields
//! [`FileRecord`]s that pass a [`SearchOptions`] policy.
//!
//! # Overview
//!
//! - **Pull-based** iteration over an explicit stack of open listings
//! - **No materialization**: memory grows with depth, not with tree size
//! - **Per-entry failures** surface as `access_denied` records, never errors
//! - **Pluggable listing** through the [`DirectorySource`] trait
//!
//! # Example
//!
//! ```rust,no_run
//! use burrow_scan::{DirectoryEnumerator, SearchOptions};
//!
//! let options = SearchOptions::builder()
//!     .pattern("*.cs;*.xaml")
//!     .recursive(true)
//!     .build()
//!     .unwrap();
//!
//! for record in DirectoryEnumerator::new("/path/to/project", options).unwrap() {
//!     if record.access_denied {
//!         eprintln!("cannot read {}", record.path.display());
//!         continue;
//!     }
//!     println!("{} ({} bytes)", record.path.display(), record.size);
//! }
//! ```
//!
//! # Stopping early
//!
//! The enumerator is an ordinary iterator; stop pulling and drop it to close
//! every listing still open:
//!
//! ```rust,no_run
//! use burrow_scan::{DirectoryEnumerator, SearchOptions};
//!
//! let options = SearchOptions::builder().recursive(true).build().unwrap();
//! let first_big = DirectoryEnumerator::new("/", options)
//!     .unwrap()
//!     .find(|r| r.size > 1 << 30);
//! ```

mod enumerator;
mod source;
mod stats;
mod visited;

pub use enumerator::{DirectoryEnumerator, enumerate};
pub use source::{DirectorySource, RawEntry, StdDirectorySource, StdListing};
pub use stats::EnumStats;
pub use visited::{DirKey, VisitedDirs};

// Re-export core types for convenience
pub use burrow_core::{
    EnumError, ExclusionMatch, FileAttributes, FileRecord, FileSpecPattern, PathExclusions,
    SearchOptions, Timestamps,
};
