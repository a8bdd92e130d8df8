//! Entry attribute flags.

use std::fs::Metadata;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Attribute bits for an enumerated entry.
    ///
    /// Bit values follow the Windows `FILE_ATTRIBUTE_*` constants so that
    /// raw attribute words can be imported with [`FileAttributes::from_bits_truncate`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FileAttributes: u32 {
        const READONLY      = 0x0000_0001;
        const HIDDEN        = 0x0000_0002;
        const SYSTEM        = 0x0000_0004;
        const DIRECTORY     = 0x0000_0010;
        /// Set only when no other attribute applies.
        const NORMAL        = 0x0000_0080;
        const TEMPORARY     = 0x0000_0100;
        /// Symbolic link or junction.
        const REPARSE_POINT = 0x0000_0400;
    }
}

impl FileAttributes {
    /// Attributes that keep an entry out of results unless hidden entries
    /// were requested.
    pub const CONCEALED: Self = Self::HIDDEN.union(Self::SYSTEM).union(Self::TEMPORARY);

    /// Derive attributes from an entry name and its (non-followed) metadata.
    pub fn from_metadata(name: &str, metadata: &Metadata) -> Self {
        let mut attrs = platform_attributes(metadata);

        let file_type = metadata.file_type();
        if file_type.is_dir() {
            attrs |= Self::DIRECTORY;
        }
        if file_type.is_symlink() {
            attrs |= Self::REPARSE_POINT;
        }
        if is_dot_hidden(name) {
            attrs |= Self::HIDDEN;
        }
        if metadata.permissions().readonly() {
            attrs |= Self::READONLY;
        }

        attrs.normalized()
    }

    /// Set `NORMAL` iff no other flag is set.
    pub fn normalized(self) -> Self {
        let rest = self.difference(Self::NORMAL);
        if rest.is_empty() { Self::NORMAL } else { rest }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(self) -> bool {
        self.contains(Self::DIRECTORY)
    }

    /// Check if this entry is a symlink or other reparse point.
    pub fn is_reparse_point(self) -> bool {
        self.contains(Self::REPARSE_POINT)
    }

    /// Check if this entry is hidden, system or temporary.
    pub fn is_concealed(self) -> bool {
        self.intersects(Self::CONCEALED)
    }
}

/// Unix convention: a leading dot hides the entry.
fn is_dot_hidden(name: &str) -> bool {
    cfg!(unix) && name.starts_with('.') && name != "." && name != ".."
}

#[cfg(windows)]
fn platform_attributes(metadata: &Metadata) -> FileAttributes {
    use std::os::windows::fs::MetadataExt;
    FileAttributes::from_bits_truncate(metadata.file_attributes())
}

#[cfg(not(windows))]
fn platform_attributes(_metadata: &Metadata) -> FileAttributes {
    FileAttributes::empty()
}
