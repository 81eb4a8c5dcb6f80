//! System abstraction for filesystem mutations
//!
//! Every change to the source or destination tree goes through the
//! [`System`] trait, so the same plan can be executed for real, printed
//! without executing (dry run), or printed and executed (verbose).

use crate::error::{Error, Result};
use mirra_core::path::AbsPath;
use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::io::Write;

/// Abstraction over mutating filesystem operations
///
/// Operations are synchronous and fallible. `remove_all` failures on a
/// missing path must satisfy [`Error::is_not_found`].
pub trait System {
    /// Rename a file or directory
    fn rename(&self, from: &AbsPath, to: &AbsPath) -> Result<()>;

    /// Remove a file, symlink, or directory and all its contents
    fn remove_all(&self, path: &AbsPath) -> Result<()>;

    /// Check if a path exists (without following a final symlink)
    fn exists(&self, path: &AbsPath) -> bool;
}

/// Real filesystem implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSystem;

impl System for RealSystem {
    fn rename(&self, from: &AbsPath, to: &AbsPath) -> Result<()> {
        fs::rename(from.as_path(), to.as_path()).map_err(|e| Error::Rename {
            from: from.clone(),
            to: to.clone(),
            source: e,
        })
    }

    fn remove_all(&self, path: &AbsPath) -> Result<()> {
        let remove_error = |e| Error::Remove {
            path: path.clone(),
            source: e,
        };

        let metadata = fs::symlink_metadata(path.as_path()).map_err(remove_error)?;
        if metadata.is_dir() {
            fs::remove_dir_all(path.as_path()).map_err(remove_error)
        } else {
            fs::remove_file(path.as_path()).map_err(remove_error)
        }
    }

    fn exists(&self, path: &AbsPath) -> bool {
        fs::symlink_metadata(path.as_path()).is_ok()
    }
}

/// An operation performed (or that would be performed) on the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Rename a path
    Rename { from: AbsPath, to: AbsPath },
    /// Remove a path recursively
    RemoveAll { path: AbsPath },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Rename { from, to } => write!(f, "mv {from} {to}"),
            Operation::RemoveAll { path } => write!(f, "rm -rf {path}"),
        }
    }
}

/// Dry-run system that prints operations without executing them
///
/// Operations are also recorded so callers (and tests) can inspect them.
/// `exists` reports the real filesystem state, so pre-flight checks behave
/// exactly as they would for a real run.
#[derive(Debug)]
pub struct DryRunSystem<W: Write> {
    out: RefCell<W>,
    operations: RefCell<Vec<Operation>>,
}

impl DryRunSystem<std::io::Stdout> {
    /// Create a dry-run system printing to stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> DryRunSystem<W> {
    /// Create a dry-run system printing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            operations: RefCell::new(Vec::new()),
        }
    }

    /// Get the list of operations that would be performed
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.borrow().clone()
    }

    /// Consume the system and return the writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn record(&self, op: Operation) -> Result<()> {
        writeln!(self.out.borrow_mut(), "{op}")?;
        self.operations.borrow_mut().push(op);
        Ok(())
    }
}

impl<W: Write> System for DryRunSystem<W> {
    fn rename(&self, from: &AbsPath, to: &AbsPath) -> Result<()> {
        self.record(Operation::Rename {
            from: from.clone(),
            to: to.clone(),
        })
    }

    fn remove_all(&self, path: &AbsPath) -> Result<()> {
        self.record(Operation::RemoveAll { path: path.clone() })
    }

    fn exists(&self, path: &AbsPath) -> bool {
        RealSystem.exists(path)
    }
}

/// Verbose system that prints each operation, then delegates to `inner`
#[derive(Debug)]
pub struct VerboseSystem<S: System, W: Write> {
    inner: S,
    out: RefCell<W>,
}

impl<S: System> VerboseSystem<S, std::io::Stdout> {
    /// Wrap `inner`, printing to stdout
    pub fn stdout(inner: S) -> Self {
        Self::new(inner, std::io::stdout())
    }
}

impl<S: System, W: Write> VerboseSystem<S, W> {
    /// Wrap `inner`, printing to `out`
    pub fn new(inner: S, out: W) -> Self {
        Self {
            inner,
            out: RefCell::new(out),
        }
    }

    /// Consume the wrapper and return the inner system and writer
    pub fn into_parts(self) -> (S, W) {
        (self.inner, self.out.into_inner())
    }

    fn print(&self, op: &Operation) -> Result<()> {
        writeln!(self.out.borrow_mut(), "{op}")?;
        Ok(())
    }
}

impl<S: System, W: Write> System for VerboseSystem<S, W> {
    fn rename(&self, from: &AbsPath, to: &AbsPath) -> Result<()> {
        self.print(&Operation::Rename {
            from: from.clone(),
            to: to.clone(),
        })?;
        self.inner.rename(from, to)
    }

    fn remove_all(&self, path: &AbsPath) -> Result<()> {
        self.print(&Operation::RemoveAll { path: path.clone() })?;
        self.inner.remove_all(path)
    }

    fn exists(&self, path: &AbsPath) -> bool {
        self.inner.exists(path)
    }
}

impl<S: System + ?Sized> System for &S {
    fn rename(&self, from: &AbsPath, to: &AbsPath) -> Result<()> {
        (**self).rename(from, to)
    }

    fn remove_all(&self, path: &AbsPath) -> Result<()> {
        (**self).remove_all(path)
    }

    fn exists(&self, path: &AbsPath) -> bool {
        (**self).exists(path)
    }
}

impl<S: System + ?Sized> System for Box<S> {
    fn rename(&self, from: &AbsPath, to: &AbsPath) -> Result<()> {
        (**self).rename(from, to)
    }

    fn remove_all(&self, path: &AbsPath) -> Result<()> {
        (**self).remove_all(path)
    }

    fn exists(&self, path: &AbsPath) -> bool {
        (**self).exists(path)
    }
}
