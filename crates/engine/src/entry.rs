//! Entry types for the source tree
//!
//! A [`SourceEntry`] is one managed unit: a directory, a regular file or a
//! symlink. Each variant pairs the physical path in the source tree (with
//! encoded attributes) with the logical target path it stands for.

use crate::attr::Attributes;
use crate::error::{Error, Result};
use mirra_core::path::{RelPath, SourceRelPath};
use std::fmt;
use std::path::PathBuf;

/// The kind of a managed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Directory
    Directory,
    /// Regular file
    File,
    /// Symbolic link
    Symlink,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryKind::Directory => "directory",
            EntryKind::File => "file",
            EntryKind::Symlink => "symlink",
        })
    }
}

/// A source entry in the source directory
///
/// Entries are read-only snapshots. Changing attributes never mutates an
/// entry; it produces a planned rename instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEntry {
    /// A regular file
    File {
        /// Path in the source directory (with encoded attributes)
        source_path: SourceRelPath,

        /// Path in the target/destination (without encoded attributes)
        target_path: RelPath,

        /// Parsed attributes from the filename
        attributes: Attributes,
    },

    /// A directory
    Directory {
        /// Path in the source directory (with encoded attributes)
        source_path: SourceRelPath,

        /// Path in the target/destination (without encoded attributes)
        target_path: RelPath,

        /// Parsed attributes from the directory name (only `private`)
        attributes: Attributes,
    },

    /// A symbolic link, stored in the source tree as a `symlink_` file
    Symlink {
        /// Path in the source directory
        source_path: SourceRelPath,

        /// Path in the target/destination
        target_path: RelPath,

        /// Parsed attributes from the filename (only `template`)
        attributes: Attributes,

        /// Where the symlink points to
        link_target: PathBuf,
    },
}

impl SourceEntry {
    /// Build an entry by decoding the last component of `source_path`
    ///
    /// `target_parent` is the already-decoded target path of the parent
    /// directory, `None` at the top of the tree.
    pub fn decode(
        kind: EntryKind,
        source_path: SourceRelPath,
        target_parent: Option<&RelPath>,
        link_target: Option<PathBuf>,
    ) -> Result<Self> {
        let source_name = physical_name(&source_path)?;
        let (attributes, target_name) = Attributes::parse_from_source(source_name, kind)?;

        let target_path = match target_parent {
            Some(parent) => parent.join_name(&target_name),
            None => RelPath::new(PathBuf::from(target_name))?,
        };

        Ok(match kind {
            EntryKind::File => SourceEntry::File {
                source_path,
                target_path,
                attributes,
            },
            EntryKind::Directory => SourceEntry::Directory {
                source_path,
                target_path,
                attributes,
            },
            EntryKind::Symlink => SourceEntry::Symlink {
                source_path,
                target_path,
                attributes,
                link_target: link_target.unwrap_or_default(),
            },
        })
    }

    /// Get the kind of this entry
    pub fn kind(&self) -> EntryKind {
        match self {
            SourceEntry::File { .. } => EntryKind::File,
            SourceEntry::Directory { .. } => EntryKind::Directory,
            SourceEntry::Symlink { .. } => EntryKind::Symlink,
        }
    }

    /// Get the source path for this entry
    pub fn source_path(&self) -> &SourceRelPath {
        match self {
            SourceEntry::File { source_path, .. }
            | SourceEntry::Directory { source_path, .. }
            | SourceEntry::Symlink { source_path, .. } => source_path,
        }
    }

    /// Get the target path for this entry
    pub fn target_path(&self) -> &RelPath {
        match self {
            SourceEntry::File { target_path, .. }
            | SourceEntry::Directory { target_path, .. }
            | SourceEntry::Symlink { target_path, .. } => target_path,
        }
    }

    /// Get the attributes for this entry
    pub fn attributes(&self) -> Attributes {
        match self {
            SourceEntry::File { attributes, .. }
            | SourceEntry::Directory { attributes, .. }
            | SourceEntry::Symlink { attributes, .. } => *attributes,
        }
    }

    /// Physical name of this entry (last source path component)
    pub fn source_name(&self) -> &str {
        self.source_path().file_name().unwrap_or_default()
    }

    /// Logical name of this entry (last target path component)
    pub fn target_name(&self) -> &str {
        self.target_path().file_name().unwrap_or_default()
    }

    /// Unix mode the target should have, if any
    pub fn mode(&self) -> Option<u32> {
        self.attributes().mode(self.kind())
    }
}

fn physical_name(source_path: &SourceRelPath) -> Result<&str> {
    let Some(name) = source_path.as_path().file_name() else {
        return Err(Error::MalformedName {
            name: source_path.to_string(),
            reason: "empty name".to_string(),
        });
    };
    name.to_str().ok_or_else(|| Error::MalformedName {
        name: name.to_string_lossy().into_owned(),
        reason: "not valid UTF-8".to_string(),
    })
}
