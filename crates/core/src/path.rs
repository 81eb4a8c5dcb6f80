//! Type-safe path types
//!
//! Three newtypes keep the two sides of the mirror apart:
//!
//! - [`AbsPath`]: Absolute filesystem paths (source root, destination root)
//! - [`RelPath`]: Logical target paths, relative to the destination
//! - [`SourceRelPath`]: Physical paths in the source tree, with encoded attributes
//!
//! A `SourceRelPath` like `private_dot_ssh/config.tmpl` and the `RelPath`
//! `.ssh/config` it decodes to can never be mixed up by accident.
//!
//! # Examples
//!
//! ```
//! use mirra_core::path::{AbsPath, RelPath};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let home = AbsPath::new("/home/user".into())?;
//! let config = RelPath::new(".config/nvim/init.lua".into())?;
//!
//! let nvim_config = home.join(&config);
//! assert_eq!(nvim_config.as_path().to_str().unwrap(), "/home/user/.config/nvim/init.lua");
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An absolute path on the filesystem
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbsPath(PathBuf);

impl AbsPath {
    /// Create a new `AbsPath` from a `PathBuf`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute.
    ///
    /// ```
    /// use mirra_core::path::AbsPath;
    ///
    /// assert!(AbsPath::new("/home/user".into()).is_ok());
    /// assert!(AbsPath::new("relative/path".into()).is_err());
    /// ```
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.is_absolute() {
            Ok(AbsPath(path))
        } else {
            Err(Error::PathNotAbsolute { path })
        }
    }

    /// Get the underlying `Path`
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Convert to a `PathBuf`
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Join with a logical target path
    pub fn join(&self, rel: &RelPath) -> Self {
        AbsPath(self.0.join(rel.as_path()))
    }

    /// Join with a physical source path
    pub fn join_source(&self, rel: &SourceRelPath) -> Self {
        AbsPath(self.0.join(rel.as_path()))
    }

    /// Strip a base directory prefix to get a relative path
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is not under `base`.
    ///
    /// ```
    /// use mirra_core::path::AbsPath;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let home = AbsPath::new("/home/user".into())?;
    /// let file = AbsPath::new("/home/user/.bashrc".into())?;
    /// assert_eq!(file.strip_prefix(&home)?.as_path().to_str(), Some(".bashrc"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn strip_prefix(&self, base: &AbsPath) -> Result<RelPath> {
        self.0
            .strip_prefix(&base.0)
            .map(|p| RelPath(p.to_path_buf()))
            .map_err(|_| Error::InvalidPathPrefix {
                path: Arc::new(self.0.clone()),
                base: Arc::new(base.0.clone()),
            })
    }
}

/// A logical path relative to the destination directory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelPath(PathBuf);

impl RelPath {
    /// Create a new `RelPath` from a `PathBuf`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is absolute.
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.is_relative() {
            Ok(RelPath(path))
        } else {
            Err(Error::PathNotRelative { path })
        }
    }

    /// Get the underlying `Path`
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Append a single name component
    pub fn join_name(&self, name: &str) -> Self {
        RelPath(self.0.join(name))
    }

    /// Get the file name
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|s| s.to_str())
    }
}

/// A physical path in the source directory with encoded attributes
///
/// ```
/// use mirra_core::path::SourceRelPath;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = SourceRelPath::new("private_dot_ssh/config".into())?;
/// let renamed = source.with_file_name("private_config");
/// assert_eq!(renamed.as_path().to_str(), Some("private_dot_ssh/private_config"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceRelPath(PathBuf);

impl SourceRelPath {
    /// Create a new `SourceRelPath` from a `PathBuf`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is absolute.
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.is_relative() {
            Ok(SourceRelPath(path))
        } else {
            Err(Error::PathNotRelative { path })
        }
    }

    /// Get the underlying `Path`
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Get the file name (the encoded physical name)
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|s| s.to_str())
    }

    /// Replace the last component, keeping the parent directories
    pub fn with_file_name(&self, name: &str) -> Self {
        SourceRelPath(self.0.with_file_name(name))
    }
}

impl std::fmt::Display for AbsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl std::fmt::Display for RelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl std::fmt::Display for SourceRelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
