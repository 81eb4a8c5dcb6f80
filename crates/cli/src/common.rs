//! Common utilities and types shared across CLI commands

use anyhow::{Context, Result};
use mirra_config::Config;
use mirra_core::path::AbsPath;
use mirra_engine::system::{DryRunSystem, RealSystem, System, VerboseSystem};
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resolved paths for dotfile operations
///
/// Existing directories are canonicalized; missing ones are made absolute
/// against the current directory, so commands that only read configuration
/// still work before the source tree exists.
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    /// Original source directory (may contain .mirra.toml)
    pub source_dir: PathBuf,
    /// Absolute destination directory
    pub dest_dir: AbsPath,
    /// Absolute dotfiles directory (source + root_entry)
    pub dotfiles_dir: AbsPath,
}

impl ResolvedPaths {
    /// Resolve all paths for dotfile operations
    ///
    /// # Errors
    ///
    /// Returns an error if a path cannot be canonicalized or made absolute.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mirra::common::ResolvedPaths;
    /// use mirra_config::Config;
    /// use std::path::Path;
    ///
    /// let config = Config::default();
    /// let paths = ResolvedPaths::resolve(
    ///     Path::new("/home/user/.local/share/mirra"),
    ///     Path::new("/home/user"),
    ///     &config
    /// )?;
    ///
    /// // paths.dotfiles_dir is /home/user/.local/share/mirra/home
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn resolve(source_dir: &Path, dest_dir: &Path, config: &Config) -> Result<Self> {
        let dotfiles_dir = config.dotfiles_dir(source_dir);

        Ok(Self {
            source_dir: source_dir.to_path_buf(),
            dest_dir: absolutize(dest_dir)?,
            dotfiles_dir: absolutize(&dotfiles_dir)?,
        })
    }
}

/// Canonicalize `path` if it exists, otherwise join it onto the current directory
pub(crate) fn absolutize(path: &Path) -> Result<AbsPath> {
    if path.exists() {
        let canonical = fs::canonicalize(path)
            .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
        Ok(AbsPath::new(canonical)?)
    } else if path.is_absolute() {
        Ok(AbsPath::new(path.to_path_buf())?)
    } else {
        Ok(AbsPath::new(std::env::current_dir()?.join(path))?)
    }
}

/// Make a command-line target absolute without following a final symlink
///
/// A symlink target names the link itself, so only its parent directory is
/// canonicalized.
pub(crate) fn absolutize_target(path: &Path) -> Result<AbsPath> {
    let is_symlink = fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
    let (true, Some(file_name)) = (is_symlink, path.file_name()) else {
        return absolutize(path);
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent_abs = fs::canonicalize(parent)
        .with_context(|| format!("Cannot resolve parent directory: {}", parent.display()))?;

    Ok(AbsPath::new(parent_abs.join(file_name))?)
}

/// How filesystem mutations are carried out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionMode {
    /// Print operations without executing them
    pub dry_run: bool,
    /// Print operations as they are executed
    pub verbose: bool,
}

/// Runtime context for CLI commands
///
/// Consolidates the configuration, resolved paths and execution mode that
/// every command needs.
///
/// # Examples
///
/// ```no_run
/// use mirra::common::{ExecutionMode, RuntimeContext};
/// use mirra_config::Config;
/// use std::path::Path;
///
/// let context = RuntimeContext::new(
///     Config::default(),
///     Path::new("/home/user/.local/share/mirra"),
///     Path::new("/home/user"),
///     ExecutionMode::default(),
/// )?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Clone)]
pub struct RuntimeContext {
    /// Shared configuration (uses Arc to avoid cloning)
    pub config: Arc<Config>,
    /// Resolved paths
    pub paths: ResolvedPaths,
    /// Dry-run / verbose selection
    pub mode: ExecutionMode,
}

impl RuntimeContext {
    /// Create a new runtime context
    ///
    /// # Errors
    ///
    /// Returns an error if path resolution fails.
    pub fn new(
        config: Config,
        source_dir: &Path,
        dest_dir: &Path,
        mode: ExecutionMode,
    ) -> Result<Self> {
        let paths = ResolvedPaths::resolve(source_dir, dest_dir, &config)?;
        Ok(Self::from_parts(Arc::new(config), paths, mode))
    }

    /// Create a context from already-resolved paths
    pub fn from_parts(config: Arc<Config>, paths: ResolvedPaths, mode: ExecutionMode) -> Self {
        Self {
            config,
            paths,
            mode,
        }
    }

    /// Get the source directory (original input, may contain .mirra.toml)
    #[inline]
    pub fn source_dir(&self) -> &Path {
        &self.paths.source_dir
    }

    /// Get the destination directory
    #[inline]
    pub fn dest_dir(&self) -> &AbsPath {
        &self.paths.dest_dir
    }

    /// Get the dotfiles directory (includes root_entry)
    #[inline]
    pub fn dotfiles_dir(&self) -> &AbsPath {
        &self.paths.dotfiles_dir
    }

    /// Build the filesystem backend for the execution mode
    ///
    /// Dry run wins over verbose: it already prints every operation.
    pub fn system(&self) -> Box<dyn System> {
        match (self.mode.dry_run, self.mode.verbose) {
            (true, _) => Box::new(DryRunSystem::stdout()),
            (false, true) => Box::new(VerboseSystem::stdout(RealSystem)),
            (false, false) => Box::new(RealSystem),
        }
    }

    /// Status marker for summary lines, colored unless disabled in config
    pub fn done_marker(&self) -> String {
        if self.config.general.color {
            "✓".green().to_string()
        } else {
            "✓".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_joins_root_entry() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("home")).unwrap();

        let paths = ResolvedPaths::resolve(temp.path(), temp.path(), &Config::default()).unwrap();
        let canonical = fs::canonicalize(temp.path()).unwrap();

        assert_eq!(paths.dotfiles_dir.as_path(), canonical.join("home"));
        assert_eq!(paths.dest_dir.as_path(), canonical);
    }

    #[test]
    fn test_resolve_missing_source_is_absolute() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("not-yet");

        let paths = ResolvedPaths::resolve(&missing, temp.path(), &Config::default()).unwrap();
        assert_eq!(paths.dotfiles_dir.as_path(), missing.join("home"));
    }

    #[test]
    fn test_done_marker_respects_color() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.general.color = false;

        let context =
            RuntimeContext::new(config, temp.path(), temp.path(), ExecutionMode::default())
                .unwrap();
        assert_eq!(context.done_marker(), "✓");
    }

    #[cfg(unix)]
    #[test]
    fn test_absolutize_target_keeps_symlink() {
        let temp = TempDir::new().unwrap();
        let base = fs::canonicalize(temp.path()).unwrap();
        fs::create_dir_all(base.join(".config")).unwrap();
        fs::write(base.join(".config/init.vim"), "").unwrap();
        std::os::unix::fs::symlink(".config/init.vim", base.join(".vimrc")).unwrap();

        let link = absolutize_target(&base.join(".vimrc")).unwrap();
        assert_eq!(link.as_path(), base.join(".vimrc"));

        let file = absolutize_target(&base.join(".config/init.vim")).unwrap();
        assert_eq!(file.as_path(), base.join(".config/init.vim"));
    }
}
