//! Source state
//!
//! Reads the source tree into a map of target path → [`SourceEntry`], and
//! resolves user-supplied target paths back to their entries.

use crate::entry::{EntryKind, SourceEntry};
use crate::error::{Error, Result};
use mirra_core::path::{AbsPath, RelPath, SourceRelPath};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

const SYMLINK_PREFIX: &str = "symlink_";

/// All entries managed by a source directory
#[derive(Debug)]
pub struct SourceState {
    /// Root directory of the source files
    root: AbsPath,

    /// Map of target paths to source entries
    entries: BTreeMap<RelPath, SourceEntry>,
}

impl SourceState {
    /// Read the source state from a directory
    ///
    /// Directories become directory entries, regular files named `symlink_*`
    /// become symlink entries (their content is the link target) and every
    /// other regular file becomes a file entry. Real symlinks inside the
    /// source tree are not managed and are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Fails if the tree cannot be walked, if any name is malformed, or if
    /// two source names decode to the same target path.
    pub fn read(root: AbsPath) -> Result<Self> {
        let root_path = root.as_path().to_path_buf();
        let mut entries = BTreeMap::new();
        // Source directory path → decoded target path, filled before children are visited
        let mut dir_targets: HashMap<PathBuf, RelPath> = HashMap::new();

        for dir_entry in WalkDir::new(&root_path)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
        {
            let dir_entry = dir_entry.map_err(|e| Error::DirectoryRead {
                path: root_path.clone(),
                source: e,
            })?;
            let path = dir_entry.path();
            let rel = path
                .strip_prefix(&root_path)
                .map_err(|_| Error::InvalidPathPrefix {
                    path: std::sync::Arc::new(path.to_path_buf()),
                    base: std::sync::Arc::new(root_path.clone()),
                })?
                .to_path_buf();

            let file_type = dir_entry.file_type();
            let name = dir_entry.file_name().to_string_lossy();
            let (kind, link_target) = if file_type.is_dir() {
                (EntryKind::Directory, None)
            } else if file_type.is_file() && name.starts_with(SYMLINK_PREFIX) {
                let abs = AbsPath::new(path.to_path_buf())?;
                let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
                    path: abs,
                    source: e,
                })?;
                (EntryKind::Symlink, Some(PathBuf::from(content.trim_end())))
            } else if file_type.is_file() {
                (EntryKind::File, None)
            } else {
                tracing::warn!("Skipping unsupported source entry: {}", path.display());
                continue;
            };

            let target_parent = rel.parent().and_then(|p| dir_targets.get(p));
            let source_path = SourceRelPath::new(rel.clone())?;
            let entry = SourceEntry::decode(kind, source_path, target_parent, link_target)?;

            if kind == EntryKind::Directory {
                dir_targets.insert(rel, entry.target_path().clone());
            }

            tracing::trace!(
                source = %entry.source_path(),
                target = %entry.target_path(),
                kind = %kind,
                "Read source entry"
            );
            insert_unique(&mut entries, entry)?;
        }

        tracing::debug!("Read {} entries from {}", entries.len(), root);

        Ok(Self { root, entries })
    }

    /// Get all source entries, ordered by target path
    pub fn entries(&self) -> impl Iterator<Item = &SourceEntry> {
        self.entries.values()
    }

    /// Get a source entry by target path
    pub fn get(&self, target_path: &RelPath) -> Option<&SourceEntry> {
        self.entries.get(target_path)
    }

    /// Resolve target paths to entries, in the order they were requested
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] for the first target that is not
    /// managed. No partial result is returned.
    pub fn resolve(&self, targets: &[RelPath]) -> Result<Vec<&SourceEntry>> {
        targets
            .iter()
            .map(|target| {
                self.get(target).ok_or_else(|| Error::EntryNotFound {
                    path: target.clone(),
                })
            })
            .collect()
    }

    /// Get the root directory
    pub fn root(&self) -> &AbsPath {
        &self.root
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn insert_unique(entries: &mut BTreeMap<RelPath, SourceEntry>, entry: SourceEntry) -> Result<()> {
    if let Some(existing) = entries.get(entry.target_path()) {
        return Err(Error::DuplicateTarget {
            target: entry.target_path().clone(),
            first: existing.source_path().clone(),
            second: entry.source_path().clone(),
        });
    }
    entries.insert(entry.target_path().clone(), entry);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn rel(p: &str) -> RelPath {
        RelPath::new(p.into()).unwrap()
    }

    fn read(temp: &TempDir) -> Result<SourceState> {
        SourceState::read(AbsPath::new(temp.path().to_path_buf()).unwrap())
    }

    #[test]
    fn test_read_decodes_nested_tree() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("private_dot_ssh")).unwrap();
        fs::write(temp.path().join("private_dot_ssh/private_config"), "Host *").unwrap();
        fs::write(temp.path().join("executable_dot_profile.tmpl"), "").unwrap();

        let state = read(&temp).unwrap();
        assert_eq!(state.len(), 3);

        let ssh = state.get(&rel(".ssh")).unwrap();
        assert_eq!(ssh.kind(), EntryKind::Directory);
        assert!(ssh.attributes().is_private());

        let config = state.get(&rel(".ssh/config")).unwrap();
        assert_eq!(
            config.source_path().as_path(),
            Path::new("private_dot_ssh/private_config")
        );

        let profile = state.get(&rel(".profile")).unwrap();
        assert!(profile.attributes().is_executable());
        assert!(profile.attributes().is_template());
    }

    #[test]
    fn test_read_symlink_entry() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("symlink_dot_vimrc"), ".config/nvim/init.vim\n").unwrap();

        let state = read(&temp).unwrap();
        match state.get(&rel(".vimrc")).unwrap() {
            SourceEntry::Symlink { link_target, .. } => {
                assert_eq!(link_target, Path::new(".config/nvim/init.vim"));
            }
            other => panic!("expected symlink, got {other:?}"),
        }
    }

    #[test]
    fn test_read_rejects_malformed_name() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("executable_private_foo"), "").unwrap();

        assert!(matches!(read(&temp), Err(Error::MalformedName { .. })));
    }

    #[test]
    fn test_read_rejects_duplicate_targets() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("foo"), "").unwrap();
        fs::write(temp.path().join("private_foo"), "").unwrap();

        match read(&temp).unwrap_err() {
            Error::DuplicateTarget { target, .. } => assert_eq!(target, rel("foo")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_preserves_request_order() {
        let temp = TempDir::new().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(temp.path().join(name), "").unwrap();
        }
        let state = read(&temp).unwrap();

        let resolved = state.resolve(&[rel("c"), rel("a"), rel("b")]).unwrap();
        let names: Vec<&str> = resolved.iter().map(|e| e.target_name()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn test_resolve_unmanaged_target_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "").unwrap();
        let state = read(&temp).unwrap();

        match state.resolve(&[rel("a"), rel("missing")]).unwrap_err() {
            Error::EntryNotFound { path } => assert_eq!(path, rel("missing")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_nothing() {
        let temp = TempDir::new().unwrap();
        let state = read(&temp).unwrap();
        assert!(state.is_empty());
        assert!(state.resolve(&[]).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_skips_real_symlinks() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("real"), "").unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();

        let state = read(&temp).unwrap();
        assert_eq!(state.len(), 1);
        assert!(state.get(&rel("alias")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_reports_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("dot_bashrc"), "").unwrap();
        let bad = temp.path().join(OsStr::from_bytes(b"caf\xe9"));
        if fs::write(&bad, "").is_err() {
            // Filesystem refuses non-UTF-8 names
            return;
        }

        match read(&temp).unwrap_err() {
            Error::MalformedName { name, reason } => {
                assert_eq!(name, "caf\u{FFFD}");
                assert_eq!(reason, "not valid UTF-8");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
