//! Error types for mirra-engine
//!
//! Every failure the engine can produce is a variant here. Nothing is logged
//! and swallowed inside the engine; the only condition callers are expected
//! to absorb is [`Error::is_not_found`] during removal.

use mirra_core::path::{AbsPath, RelPath, SourceRelPath};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for mirra-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mirra-engine
#[derive(Error, Debug)]
pub enum Error {
    /// Modifier expression names an attribute that does not exist
    #[error("unknown attribute: {attribute}")]
    UnknownAttribute { attribute: String },

    /// A physical name does not follow the encoding grammar for its kind
    #[error("malformed source name '{name}': {reason}")]
    MalformedName { name: String, reason: String },

    /// A requested target is not managed by the source state
    #[error("{path}: not managed")]
    EntryNotFound { path: RelPath },

    /// Two source entries decode to the same target path
    #[error("{target}: duplicate source entries {first} and {second}")]
    DuplicateTarget {
        target: RelPath,
        first: SourceRelPath,
        second: SourceRelPath,
    },

    /// Renaming a source path failed
    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: AbsPath,
        to: AbsPath,
        #[source]
        source: std::io::Error,
    },

    /// Removing a path failed
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: AbsPath,
        #[source]
        source: std::io::Error,
    },

    /// Two entries would be renamed to the same physical path
    #[error("both {first} and {second} would be renamed to {to}")]
    RenameCollision {
        first: AbsPath,
        second: AbsPath,
        to: AbsPath,
    },

    /// The new physical path of a rename is already taken
    #[error("cannot rename {from} to {to}: destination already exists")]
    RenameTargetExists { from: AbsPath, to: AbsPath },

    /// Error walking the source directory
    #[error("failed to read source directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Error reading a file (symlink targets are stored as file content)
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: AbsPath,
        #[source]
        source: std::io::Error,
    },

    /// Path is not absolute
    #[error("Path must be absolute: {path}")]
    PathNotAbsolute { path: PathBuf },

    /// Path is not relative
    #[error("Path must be relative: {path}")]
    PathNotRelative { path: PathBuf },

    /// Invalid path prefix
    #[error("Path {} is not under base directory {}", path.display(), base.display())]
    InvalidPathPrefix {
        path: Arc<PathBuf>,
        base: Arc<PathBuf>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<mirra_core::Error> for Error {
    fn from(err: mirra_core::Error) -> Self {
        match err {
            mirra_core::Error::PathNotAbsolute { path } => Error::PathNotAbsolute { path },
            mirra_core::Error::PathNotRelative { path } => Error::PathNotRelative { path },
            mirra_core::Error::InvalidPathPrefix { path, base } => {
                Error::InvalidPathPrefix { path, base }
            }
            mirra_core::Error::Io(e) => Error::Io(e),
            mirra_core::Error::Message(message) => {
                Error::Io(std::io::Error::other(message))
            }
        }
    }
}

impl Error {
    /// Create a `MalformedName` error
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the path did not exist
    pub fn is_not_found(&self) -> bool {
        let io = match self {
            Error::Rename { source, .. }
            | Error::Remove { source, .. }
            | Error::FileRead { source, .. }
            | Error::Io(source) => source,
            _ => return false,
        };
        io.kind() == std::io::ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::io;

    fn abs(p: &str) -> AbsPath {
        AbsPath::new(p.into()).unwrap()
    }

    #[test]
    fn test_remove_not_found_is_classified() {
        let err = Error::Remove {
            path: abs("/src/missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_permission_denied_is_not_not_found() {
        let err = Error::Remove {
            path: abs("/src/locked"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_unknown_attribute_message() {
        let err = Error::UnknownAttribute {
            attribute: "bogus".to_string(),
        };
        assert_eq!(err.to_string(), "unknown attribute: bogus");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_rename_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::Rename {
            from: abs("/src/a"),
            to: abs("/src/b"),
            source: io::Error::other("disk on fire"),
        };
        assert!(err.to_string().contains("/src/a"));
        assert_eq!(err.source().unwrap().to_string(), "disk on fire");
    }

    #[test]
    fn test_core_error_conversion() {
        let core = mirra_core::Error::PathNotAbsolute {
            path: PathBuf::from("relative"),
        };
        assert!(matches!(Error::from(core), Error::PathNotAbsolute { .. }));
    }
}
