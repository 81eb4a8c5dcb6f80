//! Rename planning for attribute changes
//!
//! Changing an attribute means changing a physical name in the source tree.
//! [`RenamePlan::build`] computes every rename needed for a set of entries,
//! and [`RenamePlan::execute`] applies them deepest-first so a directory is
//! never renamed before its contents.

use crate::attr::Attributes;
use crate::entry::{EntryKind, SourceEntry};
use crate::error::{Error, Result};
use crate::modifier::ModifierSet;
use crate::system::System;
use mirra_core::path::AbsPath;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Planned renames, keyed by old absolute source path
///
/// Paths compare component-wise, so in descending order every path comes
/// before all of its ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    renames: BTreeMap<AbsPath, AbsPath>,
}

impl RenamePlan {
    /// Plan the renames that apply `modifiers` to `entries`
    ///
    /// Each entry's physical name is decoded again under its kind, the
    /// modifiers the kind supports are applied, and the result is encoded
    /// with the entry's logical name. Only names that change are recorded.
    /// Modifiers for attributes a kind cannot carry are ignored for that
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedName`] if a physical name no longer decodes,
    /// and [`Error::RenameCollision`] if two entries would end up with the
    /// same physical path.
    pub fn build<'a>(
        entries: impl IntoIterator<Item = &'a SourceEntry>,
        modifiers: &ModifierSet,
        source_root: &AbsPath,
    ) -> Result<Self> {
        let mut renames = BTreeMap::new();
        let mut claimed: BTreeMap<AbsPath, AbsPath> = BTreeMap::new();

        for entry in entries {
            let kind = entry.kind();
            let old_name = entry.source_name();
            let (current, _) = Attributes::parse_from_source(old_name, kind)?;
            let updated = restricted_apply(modifiers, current, kind);
            let new_name = updated.encode_source_name(entry.target_name(), kind);

            if new_name == old_name {
                tracing::debug!(
                    source = %entry.source_path(),
                    attributes = %current,
                    "Attributes unchanged"
                );
                continue;
            }

            let old = source_root.join_source(entry.source_path());
            let new = source_root.join_source(&entry.source_path().with_file_name(&new_name));

            if let Some(previous) = claimed.get(&new) {
                if *previous == old {
                    continue;
                }
                return Err(Error::RenameCollision {
                    first: previous.clone(),
                    second: old,
                    to: new,
                });
            }

            tracing::debug!(
                source = %entry.source_path(),
                from = %current,
                to = %updated,
                "Planned rename to {new_name}"
            );
            claimed.insert(new.clone(), old.clone());
            renames.insert(old, new);
        }

        Ok(Self { renames })
    }

    /// Renames in execution order: old path descending
    pub fn ordered(&self) -> impl Iterator<Item = (&AbsPath, &AbsPath)> {
        self.renames.iter().rev()
    }

    /// Get the new path planned for `old`
    pub fn get(&self, old: &AbsPath) -> Option<&AbsPath> {
        self.renames.get(old)
    }

    /// Get the number of planned renames
    pub fn len(&self) -> usize {
        self.renames.len()
    }

    /// Check if there is nothing to rename
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    /// Check that no rename would overwrite an existing path
    ///
    /// A new path may exist only if it is itself renamed away earlier in
    /// [`ordered`](Self::ordered), i.e. it sorts after the path moving onto it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenameTargetExists`] for the first conflict found.
    pub fn check_preflight<S: System>(&self, system: &S) -> Result<()> {
        for (old, new) in self.ordered() {
            let vacated_first = new > old && self.renames.contains_key(new);
            if system.exists(new) && !vacated_first {
                return Err(Error::RenameTargetExists {
                    from: old.clone(),
                    to: new.clone(),
                });
            }
        }
        Ok(())
    }

    /// Run the pre-flight check, then rename every entry in order
    ///
    /// The first failure aborts the run. Renames already applied stay
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns the pre-flight error or the first rename error.
    pub fn execute<S: System>(&self, system: &S) -> Result<()> {
        self.check_preflight(system)?;

        for (old, new) in self.ordered() {
            system.rename(old, new)?;
        }

        tracing::debug!("Applied {} renames", self.len());
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RenamePlan {
    type Item = (&'a AbsPath, &'a AbsPath);
    type IntoIter = std::iter::Rev<btree_map::Iter<'a, AbsPath, AbsPath>>;

    fn into_iter(self) -> Self::IntoIter {
        self.renames.iter().rev()
    }
}

/// Apply only the modifiers that `kind` can carry
fn restricted_apply(modifiers: &ModifierSet, attrs: Attributes, kind: EntryKind) -> Attributes {
    let mut result = attrs;
    match kind {
        EntryKind::Directory => {
            result.set_private(modifiers.private.modify(attrs.is_private()));
        }
        EntryKind::Symlink => {
            result.set_template(modifiers.template.modify(attrs.is_template()));
        }
        EntryKind::File => result = modifiers.apply(attrs),
    }
    result & Attributes::legal_for(kind)
}
