//! Directory listing sources.
//!
//! The enumerator never touches the filesystem directly. It asks a
//! [`DirectorySource`] to open one directory at a time and pulls entries
//! from the returned listing; dropping the listing releases the underlying
//! handle.

use std::ffi::OsString;
use std::fs::{self, DirEntry, ReadDir};
use std::io;
use std::path::Path;

use burrow_core::{FileAttributes, FileSpecPattern, Timestamps};

use crate::visited::DirKey;

/// One entry as reported by a listing.
#[derive(Debug, Clone)]
pub struct RawEntry {
    /// Raw base name.
    pub file_name: OsString,
    /// Attribute bits (not following symlinks).
    pub attributes: FileAttributes,
    /// Size in bytes.
    pub size: u64,
    /// Entry timestamps.
    pub timestamps: Timestamps,
    /// The listing produced the name but its metadata could not be read.
    pub metadata_unavailable: bool,
}

impl RawEntry {
    /// Entry with readable metadata.
    pub fn new(
        file_name: impl Into<OsString>,
        attributes: FileAttributes,
        size: u64,
        timestamps: Timestamps,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            attributes: attributes.normalized(),
            size,
            timestamps,
            metadata_unavailable: false,
        }
    }

    /// Entry whose metadata could not be read.
    pub fn unavailable(file_name: impl Into<OsString>, attributes: FileAttributes) -> Self {
        Self {
            file_name: file_name.into(),
            attributes: attributes.normalized(),
            size: 0,
            timestamps: Timestamps::default(),
            metadata_unavailable: true,
        }
    }

    /// Check if this is the `.` or `..` pseudo-entry.
    pub fn is_dot_entry(&self) -> bool {
        self.file_name == "." || self.file_name == ".."
    }
}

/// Platform capability to list one directory at a time.
pub trait DirectorySource {
    /// An open listing. Dropping it closes the handle.
    type Listing: Iterator<Item = io::Result<RawEntry>>;

    /// Start listing `dir`.
    ///
    /// `hint` is a file spec the source may use to pre-filter non-directory
    /// entries. Sources are free to ignore it; the enumerator re-checks
    /// every file against its own pattern.
    fn open(&self, dir: &Path, hint: Option<&FileSpecPattern>) -> io::Result<Self::Listing>;

    /// Identity of the directory at `path`, following symlinks.
    ///
    /// Returns `None` if `path` does not resolve to a directory.
    fn directory_key(&self, path: &Path) -> Option<DirKey>;

    /// Attributes of the entry at `path` itself, not following symlinks.
    ///
    /// Only asked for the root, whose attributes no listing reports.
    fn attributes(&self, path: &Path) -> Option<FileAttributes>;
}

/// Source backed by [`std::fs::read_dir`].
///
/// Ignores the spec hint: `read_dir` cannot filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDirectorySource;

impl DirectorySource for StdDirectorySource {
    type Listing = StdListing;

    fn open(&self, dir: &Path, _hint: Option<&FileSpecPattern>) -> io::Result<Self::Listing> {
        Ok(StdListing {
            inner: fs::read_dir(dir)?,
        })
    }

    fn directory_key(&self, path: &Path) -> Option<DirKey> {
        let metadata = fs::metadata(path).ok()?;
        if !metadata.is_dir() {
            return None;
        }
        platform_key(path, &metadata)
    }

    fn attributes(&self, path: &Path) -> Option<FileAttributes> {
        let metadata = fs::symlink_metadata(path).ok()?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Some(FileAttributes::from_metadata(&name, &metadata))
    }
}

/// Open `read_dir` handle.
#[derive(Debug)]
pub struct StdListing {
    inner: ReadDir,
}

impl Iterator for StdListing {
    type Item = io::Result<RawEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| entry.map(raw_entry))
    }
}

fn raw_entry(entry: DirEntry) -> RawEntry {
    let file_name = entry.file_name();
    match entry.metadata() {
        Ok(metadata) => {
            let attributes =
                FileAttributes::from_metadata(&file_name.to_string_lossy(), &metadata);
            let size = if attributes.is_dir() { 0 } else { metadata.len() };
            RawEntry::new(file_name, attributes, size, Timestamps::from_metadata(&metadata))
        }
        Err(_) => {
            let attributes = match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => FileAttributes::DIRECTORY,
                _ => FileAttributes::empty(),
            };
            RawEntry::unavailable(file_name, attributes)
        }
    }
}

#[cfg(unix)]
fn platform_key(_path: &Path, metadata: &fs::Metadata) -> Option<DirKey> {
    use std::os::unix::fs::MetadataExt;
    Some(DirKey::Inode {
        device: metadata.dev(),
        inode: metadata.ino(),
    })
}

#[cfg(not(unix))]
fn platform_key(path: &Path, _metadata: &fs::Metadata) -> Option<DirKey> {
    fs::canonicalize(path).ok().map(DirKey::Canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_std_listing_reports_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "hello").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let mut entries: Vec<RawEntry> = StdDirectorySource
            .open(temp.path(), None)
            .unwrap()
            .collect::<io::Result<_>>()
            .unwrap();
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name, "a.txt");
        assert_eq!(entries[0].size, 5);
        assert!(!entries[0].attributes.is_dir());
        assert_eq!(entries[1].file_name, "sub");
        assert!(entries[1].attributes.is_dir());
        assert!(entries.iter().all(|e| !e.metadata_unavailable));
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let result = StdDirectorySource.open(&temp.path().join("missing"), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_directory_key() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "hello").unwrap();

        let key = StdDirectorySource.directory_key(temp.path());
        assert!(key.is_some());
        assert_eq!(key, StdDirectorySource.directory_key(temp.path()));
        assert!(StdDirectorySource.directory_key(&temp.path().join("a.txt")).is_none());
    }

    #[test]
    fn test_attributes_of_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "hello").unwrap();

        let dir = StdDirectorySource.attributes(temp.path()).unwrap();
        let file = StdDirectorySource.attributes(&temp.path().join("a.txt")).unwrap();
        assert!(dir.is_dir());
        assert!(!file.is_dir());
        assert!(StdDirectorySource.attributes(&temp.path().join("missing")).is_none());
    }

    #[test]
    fn test_dot_entries() {
        assert!(RawEntry::unavailable(".", FileAttributes::DIRECTORY).is_dot_entry());
        assert!(RawEntry::unavailable("..", FileAttributes::DIRECTORY).is_dot_entry());
        assert!(!RawEntry::unavailable(".git", FileAttributes::DIRECTORY).is_dot_entry());
    }
}
