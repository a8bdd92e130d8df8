//! Core types for burrow.
//!
//! This crate provides the data model shared by the enumerator and the
//! analyzers: file records, attribute bits, file-spec patterns, path
//! exclusions and search options.

mod attributes;
mod config;
mod error;
mod exclusion;
mod pattern;
mod record;

pub use attributes::FileAttributes;
pub use config::{SearchOptions, SearchOptionsBuilder, SearchOptionsBuilderError};
pub use error::EnumError;
pub use exclusion::{ExclusionMatch, PathExclusions, normalize_path};
pub use pattern::FileSpecPattern;
pub use record::{ContentHash, FileRecord, Timestamps, hash_file};
