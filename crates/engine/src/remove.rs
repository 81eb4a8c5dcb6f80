//! Removal of managed entries
//!
//! Removing an entry deletes both its target in the destination directory
//! and its source in the source tree. A path that is already gone counts as
//! removed, so running the same removal twice succeeds.

use crate::entry::SourceEntry;
use crate::error::Result;
use crate::system::System;
use mirra_core::path::AbsPath;

/// Remove the target and the source of every entry, in order
///
/// Returns the number of paths that were actually removed.
///
/// # Errors
///
/// The first failure other than "not found" aborts the removal. Entries
/// processed before it stay removed.
pub fn remove_entries<'a, S: System>(
    entries: impl IntoIterator<Item = &'a SourceEntry>,
    dest_root: &AbsPath,
    source_root: &AbsPath,
    system: &S,
) -> Result<usize> {
    let mut removed = 0;

    for entry in entries {
        let target = dest_root.join(entry.target_path());
        let source = source_root.join_source(entry.source_path());

        for path in [&target, &source] {
            if remove_if_present(path, system)? {
                removed += 1;
            }
        }
    }

    Ok(removed)
}

fn remove_if_present<S: System>(path: &AbsPath, system: &S) -> Result<bool> {
    match system.remove_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.is_not_found() => {
            tracing::debug!("Already absent: {}", path);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entry::EntryKind;
    use crate::error::Error;
    use crate::system::RealSystem;
    use mirra_core::path::{RelPath, SourceRelPath};
    use std::cell::RefCell;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    /// Fails `remove_all` with a fixed error kind for chosen paths
    #[derive(Default)]
    struct ScriptedSystem {
        failures: Vec<(AbsPath, io::ErrorKind)>,
        calls: RefCell<Vec<AbsPath>>,
    }

    impl System for ScriptedSystem {
        fn rename(&self, _from: &AbsPath, _to: &AbsPath) -> Result<()> {
            unreachable!("removal never renames")
        }

        fn remove_all(&self, path: &AbsPath) -> Result<()> {
            self.calls.borrow_mut().push(path.clone());
            match self.failures.iter().find(|(p, _)| p == path) {
                Some((_, kind)) => Err(Error::Remove {
                    path: path.clone(),
                    source: io::Error::from(*kind),
                }),
                None => Ok(()),
            }
        }

        fn exists(&self, _path: &AbsPath) -> bool {
            true
        }
    }

    fn abs(p: &str) -> AbsPath {
        AbsPath::new(p.into()).unwrap()
    }

    fn file_entry(source: &str) -> SourceEntry {
        SourceEntry::decode(
            EntryKind::File,
            SourceRelPath::new(source.into()).unwrap(),
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_removes_target_then_source() {
        let entries = [file_entry("dot_a"), file_entry("private_b")];
        let system = ScriptedSystem::default();

        let removed =
            remove_entries(&entries, &abs("/home"), &abs("/src"), &system).unwrap();

        assert_eq!(removed, 4);
        assert_eq!(
            *system.calls.borrow(),
            [
                abs("/home/.a"),
                abs("/src/dot_a"),
                abs("/home/b"),
                abs("/src/private_b")
            ]
        );
    }

    #[test]
    fn test_not_found_is_absorbed() {
        let entries = [file_entry("a"), file_entry("b")];
        let system = ScriptedSystem {
            failures: vec![(abs("/home/a"), io::ErrorKind::NotFound)],
            ..Default::default()
        };

        let removed =
            remove_entries(&entries, &abs("/home"), &abs("/src"), &system).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(system.calls.borrow().len(), 4);
    }

    #[test]
    fn test_other_errors_abort() {
        let entries = [file_entry("a"), file_entry("b")];
        let system = ScriptedSystem {
            failures: vec![(abs("/src/a"), io::ErrorKind::PermissionDenied)],
            ..Default::default()
        };

        let err = remove_entries(&entries, &abs("/home"), &abs("/src"), &system).unwrap_err();
        match err {
            Error::Remove { path, source } => {
                assert_eq!(path, abs("/src/a"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(system.calls.borrow().len(), 2);
    }

    #[test]
    fn test_removal_is_idempotent_on_disk() {
        let home = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".ssh")).unwrap();
        fs::write(home.path().join(".ssh/config"), "").unwrap();
        fs::create_dir_all(src.path().join("private_dot_ssh")).unwrap();
        fs::write(src.path().join("private_dot_ssh/config"), "").unwrap();

        let dest_root = AbsPath::new(home.path().to_path_buf()).unwrap();
        let source_root = AbsPath::new(src.path().to_path_buf()).unwrap();
        let entry = SourceEntry::decode(
            EntryKind::Directory,
            SourceRelPath::new("private_dot_ssh".into()).unwrap(),
            None,
            None,
        )
        .unwrap();
        assert_eq!(entry.target_path(), &RelPath::new(".ssh".into()).unwrap());

        let first = remove_entries([&entry], &dest_root, &source_root, &RealSystem).unwrap();
        let second = remove_entries([&entry], &dest_root, &source_root, &RealSystem).unwrap();

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert!(!home.path().join(".ssh").exists());
        assert!(!src.path().join("private_dot_ssh").exists());
    }
}
