//! Per-entry snapshots yielded by the enumerator.

use std::cell::OnceCell;
use std::fs::{File, Metadata};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::attributes::FileAttributes;

const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// BLAKE3 content hash used for content comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Hash a file's full contents.
///
/// Stateless: every call builds its own hasher.
pub fn hash_file(path: &Path) -> io::Result<ContentHash> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(ContentHash::new(*hasher.finalize().as_bytes()))
}

/// Entry timestamps, stored in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Creation time (platform-dependent).
    pub created: Option<DateTime<Utc>>,
    /// Last access time (may be unavailable under some mount options).
    pub accessed: Option<DateTime<Utc>>,
    /// Last write time.
    pub modified: Option<DateTime<Utc>>,
}

impl Timestamps {
    /// Create timestamps with all available times.
    pub fn new(
        created: Option<DateTime<Utc>>,
        accessed: Option<DateTime<Utc>>,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            created,
            accessed,
            modified,
        }
    }

    /// Read whatever times the platform reports.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            created: metadata.created().ok().map(DateTime::<Utc>::from),
            accessed: metadata.accessed().ok().map(DateTime::<Utc>::from),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        }
    }

    pub fn created_local(&self) -> Option<DateTime<Local>> {
        self.created.map(|t| t.with_timezone(&Local))
    }

    pub fn accessed_local(&self) -> Option<DateTime<Local>> {
        self.accessed.map(|t| t.with_timezone(&Local))
    }

    pub fn modified_local(&self) -> Option<DateTime<Local>> {
        self.modified.map(|t| t.with_timezone(&Local))
    }
}

/// Snapshot of one filesystem entry.
///
/// `size` and `timestamps` are only meaningful when `access_denied` is
/// false. The content hash is computed on first request and cached; a
/// failed computation is cached too, which marks the record as one to
/// [avoid](FileRecord::avoid) and is never retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Base name (not full path).
    pub name: CompactString,

    /// Full path: parent directory joined with the raw entry name.
    pub path: PathBuf,

    /// Attribute bits.
    pub attributes: FileAttributes,

    /// Creation, access and write times.
    pub timestamps: Timestamps,

    /// Size in bytes (zero for directories).
    pub size: u64,

    /// The listing itself failed for this entry.
    pub access_denied: bool,

    #[serde(skip)]
    hash: OnceCell<Option<ContentHash>>,
}

impl FileRecord {
    /// Create a record from already-gathered metadata.
    pub fn new(
        path: impl Into<PathBuf>,
        attributes: FileAttributes,
        size: u64,
        timestamps: Timestamps,
    ) -> Self {
        let path = path.into();
        Self {
            name: base_name(&path),
            path,
            attributes,
            timestamps,
            size,
            access_denied: false,
            hash: OnceCell::new(),
        }
    }

    /// Create a record from an entry's non-followed metadata.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> Self {
        let path = path.into();
        let attributes = FileAttributes::from_metadata(&base_name(&path), metadata);
        let size = if attributes.is_dir() { 0 } else { metadata.len() };
        Self::new(path, attributes, size, Timestamps::from_metadata(metadata))
    }

    /// Create a sentinel for an entry the platform refused to list.
    pub fn denied(path: impl Into<PathBuf>, attributes: FileAttributes) -> Self {
        let mut record = Self::new(path, attributes.normalized(), 0, Timestamps::default());
        record.access_denied = true;
        record
    }

    /// Combine a platform-reported size split into 32-bit halves.
    pub fn combine_size(high: u32, low: u32) -> u64 {
        (u64::from(high) << 32) | u64::from(low)
    }

    /// Check if this record is a directory.
    pub fn is_dir(&self) -> bool {
        self.attributes.is_dir()
    }

    /// Check if this record is hidden, system or temporary.
    pub fn is_concealed(&self) -> bool {
        self.attributes.is_concealed()
    }

    /// Content hash, computed on first call.
    ///
    /// Returns `None` if the content could not be read, now or on an
    /// earlier call. Directories, denied records and reparse points (links)
    /// are never hashed: a link's `size` describes the link itself, while
    /// opening it would read the target.
    pub fn content_hash(&self) -> Option<&ContentHash> {
        self.hash
            .get_or_init(|| {
                if self.access_denied || self.is_dir() || self.attributes.is_reparse_point() {
                    return None;
                }
                match hash_file(&self.path) {
                    Ok(hash) => {
                        debug!(path = %self.path.display(), "computed content hash");
                        Some(hash)
                    }
                    Err(err) => {
                        warn!(path = %self.path.display(), error = %err, "cannot hash file content");
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Check if a hash computation has been attempted.
    pub fn is_hash_evaluated(&self) -> bool {
        self.hash.get().is_some()
    }

    /// True once hashing has failed for this record.
    pub fn avoid(&self) -> bool {
        matches!(self.hash.get(), Some(None))
    }

    /// Compare contents by digest.
    ///
    /// Sizes are compared first, so records of different length are never
    /// hashed. Equal digests are taken as equal content; the collision risk
    /// of a 256-bit digest is accepted.
    pub fn is_same_content_as(&self, other: &FileRecord) -> bool {
        if self.avoid() || other.avoid() {
            return false;
        }
        if self.size != other.size {
            return false;
        }
        match (self.content_hash(), other.content_hash()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

fn base_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
