//! Remove command implementation
//!
//! Stop managing targets: delete each target from the destination directory
//! and its entry from the source directory.

use clap::Args;
use mirra_engine::remove::remove_entries;
use mirra_engine::state::SourceState;
use std::path::PathBuf;

use crate::build_filter_paths;
use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Remove command arguments
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Targets to remove, as paths in the destination directory
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<PathBuf>,
}

impl Command for RemoveCommand {
    /// Number of paths removed from disk
    type Output = usize;

    fn execute(&self, context: &RuntimeContext) -> Result<usize> {
        let targets = build_filter_paths(&self.targets, context.dest_dir())?;

        let state = SourceState::read(context.dotfiles_dir().clone())?;
        let entries = state.resolve(&targets)?;

        let removed = remove_entries(
            entries.iter().copied(),
            context.dest_dir(),
            state.root(),
            &context.system(),
        )?;

        if !context.mode.dry_run {
            println!(
                "{} Removed {} {}",
                context.done_marker(),
                entries.len(),
                if entries.len() == 1 { "target" } else { "targets" }
            );
        }

        tracing::debug!("Removed {removed} paths for {} targets", entries.len());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::common::ExecutionMode;
    use crate::error::CommandError;
    use mirra_config::Config;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn setup(base: &Path) -> (PathBuf, PathBuf) {
        let source = base.join("source");
        let dest = base.join("dest");
        fs::create_dir_all(source.join("home/private_dot_ssh")).unwrap();
        fs::write(source.join("home/private_dot_ssh/config"), "").unwrap();
        fs::write(source.join("home/dot_vimrc"), "").unwrap();
        fs::create_dir_all(dest.join(".ssh")).unwrap();
        fs::write(dest.join(".ssh/config"), "").unwrap();
        (source, dest)
    }

    fn context(source: &Path, dest: &Path, mode: ExecutionMode) -> RuntimeContext {
        RuntimeContext::new(Config::default(), source, dest, mode).unwrap()
    }

    #[test]
    fn test_remove_target_and_source() {
        let temp = TempDir::new().unwrap();
        let base = fs::canonicalize(temp.path()).unwrap();
        let (source, dest) = setup(&base);

        let command = RemoveCommand {
            targets: vec![dest.join(".ssh"), dest.join(".vimrc")],
        };
        let removed = command
            .execute(&context(&source, &dest, ExecutionMode::default()))
            .unwrap();

        // .vimrc was never applied, so only its source is removed
        assert_eq!(removed, 3);
        assert!(!dest.join(".ssh").exists());
        assert!(!source.join("home/private_dot_ssh").exists());
        assert!(!source.join("home/dot_vimrc").exists());
    }

    #[test]
    fn test_remove_dry_run_keeps_everything() {
        let temp = TempDir::new().unwrap();
        let base = fs::canonicalize(temp.path()).unwrap();
        let (source, dest) = setup(&base);

        let mode = ExecutionMode {
            dry_run: true,
            verbose: false,
        };
        let command = RemoveCommand {
            targets: vec![dest.join(".ssh")],
        };
        command.execute(&context(&source, &dest, mode)).unwrap();

        assert!(dest.join(".ssh/config").exists());
        assert!(source.join("home/private_dot_ssh/config").exists());
    }

    #[test]
    fn test_remove_unmanaged_target_is_an_error() {
        let temp = TempDir::new().unwrap();
        let base = fs::canonicalize(temp.path()).unwrap();
        let (source, dest) = setup(&base);

        let command = RemoveCommand {
            targets: vec![dest.join(".vimrc"), dest.join(".unmanaged")],
        };
        let err = command
            .execute(&context(&source, &dest, ExecutionMode::default()))
            .unwrap_err();

        assert!(matches!(
            err,
            CommandError::Engine(mirra_engine::Error::EntryNotFound { .. })
        ));
        assert!(source.join("home/dot_vimrc").exists());
    }
}
