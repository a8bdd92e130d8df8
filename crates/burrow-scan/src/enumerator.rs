//! Streaming depth-first directory enumerator.

use std::iter::FusedIterator;
use std::mem;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use burrow_core::{EnumError, FileAttributes, FileRecord, SearchOptions, Timestamps};

use crate::source::{DirectorySource, RawEntry, StdDirectorySource};
use crate::stats::EnumStats;
use crate::visited::VisitedDirs;

/// A parent directory whose listing was suspended to descend into a child.
struct Frame<L> {
    listing: Option<L>,
    path: PathBuf,
    attributes: Option<FileAttributes>,
}

/// Lazy, pull-based, pre-order walk of a directory tree.
///
/// Each call to [`Iterator::next`] advances through at most one listing
/// entry at a time until a record passes the filters. Parent listings stay
/// open on an explicit stack while a subdirectory is walked, so the depth of
/// the stack equals the current recursion depth and nothing is collected up
/// front.
///
/// Directories that cannot be opened produce a single record with
/// `access_denied` set, and the walk carries on with the next sibling.
///
/// The sequence is single pass. Dropping the enumerator closes every open
/// listing.
pub struct DirectoryEnumerator<S: DirectorySource = StdDirectorySource> {
    source: S,
    options: SearchOptions,
    root: PathBuf,
    current_path: PathBuf,
    /// Attributes of `current_path` as its parent listed it (`None` for the root).
    current_attributes: Option<FileAttributes>,
    listing: Option<S::Listing>,
    stack: Vec<Frame<S::Listing>>,
    visited: VisitedDirs,
    stats: EnumStats,
    finished: bool,
}

/// Enumerate `root` with the platform directory source.
pub fn enumerate(
    root: impl AsRef<Path>,
    options: SearchOptions,
) -> Result<DirectoryEnumerator, EnumError> {
    DirectoryEnumerator::new(root, options)
}

impl DirectoryEnumerator<StdDirectorySource> {
    /// Create an enumerator over the real filesystem.
    pub fn new(root: impl AsRef<Path>, options: SearchOptions) -> Result<Self, EnumError> {
        Self::with_source(root, options, StdDirectorySource)
    }
}

impl<S: DirectorySource> DirectoryEnumerator<S> {
    /// Create an enumerator over a custom listing source.
    ///
    /// The root must be non-empty; it is made absolute before the walk
    /// starts. Options that skipped builder validation are re-checked.
    /// Whether the root can be listed is only discovered on the first pull.
    pub fn with_source(
        root: impl AsRef<Path>,
        options: SearchOptions,
        source: S,
    ) -> Result<Self, EnumError> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(EnumError::invalid_argument("root path cannot be empty"));
        }
        options.validate()?;
        let root = std::path::absolute(root).map_err(|err| {
            EnumError::invalid_argument(format!(
                "cannot resolve root path {}: {err}",
                root.display()
            ))
        })?;

        let mut visited = VisitedDirs::new();
        if options.follow_symlinks {
            if let Some(key) = source.directory_key(&root) {
                visited.track(key);
            }
        }

        debug!(root = %root.display(), pattern = %options.pattern, recursive = options.recursive, "starting enumeration");

        Ok(Self {
            source,
            options,
            current_path: root.clone(),
            current_attributes: None,
            root,
            listing: None,
            stack: Vec::new(),
            visited,
            stats: EnumStats::new(),
            finished: false,
        })
    }

    /// Absolute root of the walk.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Options this walk filters with.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Counters so far.
    pub fn stats(&self) -> &EnumStats {
        &self.stats
    }

    /// Number of suspended parent listings.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Directory currently being listed.
    pub fn current_dir(&self) -> &Path {
        &self.current_path
    }

    /// Open the listing for `current_path`.
    ///
    /// On failure, returns the sentinel record and treats the directory as
    /// exhausted.
    fn open_current(&mut self) -> Option<FileRecord> {
        match self.source.open(&self.current_path, self.options.listing_hint()) {
            Ok(listing) => {
                trace!(dir = %self.current_path.display(), "opened listing");
                self.listing = Some(listing);
                self.stats.dirs_entered += 1;
                None
            }
            Err(err) => {
                let err = EnumError::io(&self.current_path, err);
                warn!(error = %err, "cannot list directory");
                self.stats.access_denied += 1;
                let attributes = self
                    .current_attributes
                    .or_else(|| self.source.attributes(&self.current_path))
                    .unwrap_or(FileAttributes::DIRECTORY);
                let record = FileRecord::denied(self.current_path.clone(), attributes);
                self.pop_frame();
                Some(record)
            }
        }
    }

    /// Drop the current listing and resume the parent, if any.
    fn pop_frame(&mut self) {
        match self.stack.pop() {
            Some(frame) => {
                trace!(dir = %self.current_path.display(), "listing exhausted");
                self.listing = frame.listing;
                self.current_path = frame.path;
                self.current_attributes = frame.attributes;
            }
            None => {
                self.listing = None;
                self.finished = true;
                debug!(
                    root = %self.root.display(),
                    records = self.stats.total_yielded(),
                    files = self.stats.files_yielded,
                    dirs = self.stats.dirs_yielded,
                    denied = self.stats.access_denied,
                    elapsed = ?self.stats.elapsed(),
                    "enumeration finished"
                );
            }
        }
    }

    /// Apply the filters to one listing entry.
    fn visit(&mut self, entry: RawEntry) -> Option<FileRecord> {
        if entry.is_dot_entry() {
            return None;
        }

        let path = self.current_path.join(&entry.file_name);
        let name = entry.file_name.to_string_lossy().into_owned();
        let mut attributes = entry.attributes;

        if entry.metadata_unavailable {
            return self.visit_unreadable(path, &name, attributes);
        }

        if attributes.is_reparse_point()
            && !attributes.is_dir()
            && self.options.follow_symlinks
            && self.source.directory_key(&path).is_some()
        {
            attributes |= FileAttributes::DIRECTORY;
        }

        if attributes.is_dir() {
            return self.visit_dir(path, &name, attributes, entry.timestamps);
        }

        if !self.options.accepts_file(&name, attributes) {
            trace!(path = %path.display(), "file filtered out");
            self.stats.entries_skipped += 1;
            return None;
        }

        self.stats.record_file(entry.size);
        Some(FileRecord::new(path, attributes, entry.size, entry.timestamps))
    }

    fn visit_dir(
        &mut self,
        path: PathBuf,
        name: &str,
        attributes: FileAttributes,
        timestamps: Timestamps,
    ) -> Option<FileRecord> {
        if !self.options.should_descend(name, &path, attributes) {
            trace!(path = %path.display(), "directory skipped");
            self.stats.entries_skipped += 1;
            return None;
        }

        let record = FileRecord::new(path.clone(), attributes, 0, timestamps);

        let depth = self.stack.len() as u32 + 1;
        if self.options.within_depth(depth) && self.first_visit(&path) {
            debug!(dir = %path.display(), depth, "descending");
            let parent = Frame {
                listing: self.listing.take(),
                path: mem::replace(&mut self.current_path, path),
                attributes: mem::replace(&mut self.current_attributes, Some(attributes)),
            };
            self.stack.push(parent);
        }

        if self.options.files_only {
            return None;
        }
        self.stats.record_dir();
        Some(record)
    }

    /// Entry whose name was listed but whose metadata could not be read.
    fn visit_unreadable(
        &mut self,
        path: PathBuf,
        name: &str,
        attributes: FileAttributes,
    ) -> Option<FileRecord> {
        let wanted = if attributes.is_dir() {
            self.options.should_descend(name, &path, attributes)
        } else {
            self.options.accepts_file(name, attributes)
        };
        if !wanted {
            self.stats.entries_skipped += 1;
            return None;
        }

        warn!(path = %path.display(), "cannot read entry metadata");
        self.stats.access_denied += 1;
        Some(FileRecord::denied(path, attributes))
    }

    /// Cycle check, only active when following symlinks.
    fn first_visit(&mut self, path: &Path) -> bool {
        if !self.options.follow_symlinks {
            return true;
        }
        match self.source.directory_key(path) {
            Some(key) => {
                let first = self.visited.track(key);
                if !first {
                    debug!(dir = %path.display(), "directory already visited, not descending");
                }
                first
            }
            None => false,
        }
    }
}

impl<S: DirectorySource> Iterator for DirectoryEnumerator<S> {
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        while !self.finished {
            let Some(listing) = self.listing.as_mut() else {
                if let Some(sentinel) = self.open_current() {
                    return Some(sentinel);
                }
                continue;
            };

            match listing.next() {
                Some(Ok(entry)) => {
                    if let Some(record) = self.visit(entry) {
                        return Some(record);
                    }
                }
                Some(Err(err)) => {
                    warn!(dir = %self.current_path.display(), error = %err, "error reading directory entry");
                    self.stats.entry_errors += 1;
                }
                None => self.pop_frame(),
            }
        }
        None
    }
}

impl<S: DirectorySource> FusedIterator for DirectoryEnumerator<S> {}
