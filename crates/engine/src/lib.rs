//! # Mirra Engine
//!
//! Core library for the mirra dotfile manager.
//!
//! The source tree stores every managed file, directory and symlink under a
//! physical name that encodes its attributes. This crate provides:
//!
//! - **Attributes**: Parsing and encoding attributes in source names
//! - **Modifiers**: The `+private,-template` expression language
//! - **Entry Types**: Representations of files, directories, and symlinks
//! - **Source State**: Reading the source tree and resolving targets
//! - **Planning**: Computing and applying deepest-first renames
//! - **Removal**: Deleting targets and sources, tolerating absent paths
//! - **System Abstraction**: Filesystem operations abstracted for dry runs and testing

pub mod attr;
pub mod entry;
pub mod error;
pub mod modifier;
pub mod plan;
pub mod remove;
pub mod state;
pub mod system;

// Re-export path types from core
pub use mirra_core::path::{AbsPath, RelPath, SourceRelPath};

pub use error::{Error, Result};

// Re-export commonly used types
pub use attr::Attributes;
pub use entry::{EntryKind, SourceEntry};
pub use modifier::{Modifier, ModifierSet};
pub use plan::RenamePlan;
pub use remove::remove_entries;
pub use state::SourceState;
pub use system::{DryRunSystem, Operation, RealSystem, System, VerboseSystem};
