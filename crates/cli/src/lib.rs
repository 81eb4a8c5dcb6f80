//! Mirra CLI library
//!
//! This library contains all the CLI logic for mirra, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mirra_config::Config;
use mirra_core::path::{AbsPath, RelPath};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use command::Command;
use common::{ExecutionMode, ResolvedPaths, RuntimeContext};
use error::CommandError;

/// Mirra - a dotfile manager that encodes attributes in source names
#[derive(Parser)]
#[command(name = "mirra")]
#[command(about = "Manage your dotfiles with mirra")]
#[command(version)]
#[command(long_about = "Manage your dotfiles with mirra

The source directory mirrors your home directory. Each entry's name
carries its attributes, e.g. `private_executable_dot_local_bin` for a
private, executable `~/.local_bin`.")]
pub struct Cli {
    /// Path to the source directory
    #[arg(long, env = "MIRRA_SOURCE_DIR", value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Path to the destination directory (usually $HOME)
    #[arg(long, env = "MIRRA_DEST_DIR", value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Path to the config file (defaults to .mirra.toml in the source directory)
    #[arg(long, env = "MIRRA_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (DEBUG level logs, print each filesystem operation)
    #[arg(short, long)]
    pub verbose: bool,

    /// Print filesystem operations instead of executing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "MIRRA_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for mirra CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Change the private, empty, executable, or template attributes of targets
    #[command(long_about = "Change the private, empty, executable, or template attributes of targets

MODIFIERS is a comma separated list of attributes, each optionally
prefixed with + (set, the default) or - (clear):

  empty (e), executable (x), private (p), template (t)

Directories only carry private and symlinks only carry template; other
modifiers are ignored for them.

Examples:
  • mirra chattr +private ~/.ssh
  • mirra chattr x,-t ~/.local/bin/deploy
  • mirra chattr -- -template ~/.gitconfig")]
    Chattr(cmd::chattr::ChattrCommand),

    /// Remove targets from the destination and the source directory
    #[command(visible_alias = "rm")]
    Remove(cmd::remove::RemoveCommand),

    /// Write the template data to stdout
    Data(cmd::data::DataCommand),
}

/// Load base config to determine source directory
fn load_base_config() -> Config {
    let Some(source_dir) = mirra_config::default_source_dir().filter(|dir| dir.exists()) else {
        return Config::default();
    };

    match Config::load_from_source(&source_dir) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                "Ignoring invalid config in {}: {e}",
                source_dir.display()
            );
            Config::default()
        }
    }
}

/// Determine source and destination directories from CLI and config
fn determine_directories(cli: &Cli, base_config: &Config) -> Result<(PathBuf, PathBuf)> {
    let source_dir = cli
        .source
        .clone()
        .or_else(|| base_config.source_dir().cloned())
        .or_else(mirra_config::default_source_dir)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Could not determine source directory. Please specify with --source or set in config file."
            )
        })?;

    let dest_dir = cli
        .dest
        .clone()
        .or_else(|| base_config.dest_dir().cloned())
        .or_else(mirra_config::default_dest_dir)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Could not determine destination directory (home directory not found). \
                 Please specify with --dest or set in config file."
            )
        })?;

    Ok((expand_tilde(&source_dir), expand_tilde(&dest_dir)))
}

/// Load the configuration for `source_dir`, or from an explicit file
fn load_config(config_path: Option<&Path>, source_dir: &Path) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(expand_tilde(path))
            .map_err(CommandError::config)
            .context("Failed to load config"),
        None => Config::load_from_source(source_dir)
            .map_err(CommandError::config)
            .context("Failed to load config"),
    }
}

fn execute_command(command: Commands, context: &RuntimeContext) -> Result<()> {
    match command {
        Commands::Chattr(chattr_cmd) => {
            chattr_cmd.execute(context)?;
        }
        Commands::Remove(remove_cmd) => {
            remove_cmd.execute(context)?;
        }
        Commands::Data(data_cmd) => {
            data_cmd.execute(context)?;
        }
    }

    Ok(())
}

/// Main entry point for the CLI logic
///
/// # Errors
///
/// Returns the first error of logging setup, configuration loading, path
/// resolution or the command itself.
pub fn run(cli: Cli) -> Result<()> {
    mirra_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let base_config = load_base_config();
    let (source_dir, dest_dir) = determine_directories(&cli, &base_config)?;

    let config = load_config(cli.config.as_deref(), &source_dir)?;
    let paths = ResolvedPaths::resolve(&source_dir, &dest_dir, &config)?;
    tracing::debug!(
        source = %paths.dotfiles_dir,
        dest = %paths.dest_dir,
        "Resolved directories"
    );

    let mode = ExecutionMode {
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };
    let context = RuntimeContext::from_parts(Arc::new(config), paths, mode);

    execute_command(cli.command, &context)
}

/// Map command-line target arguments to paths relative to the destination
pub(crate) fn build_filter_paths(
    files: &[PathBuf],
    dest_abs: &AbsPath,
) -> error::Result<Vec<RelPath>> {
    files
        .iter()
        .map(|file_path| {
            let expanded_path = expand_tilde(file_path);
            let file_abs = common::absolutize_target(&expanded_path)?;

            file_abs.strip_prefix(dest_abs).map_err(|_| {
                CommandError::path_not_under_dest(
                    file_abs.into_path_buf(),
                    dest_abs.as_path().to_path_buf(),
                )
            })
        })
        .collect()
}

fn expand_tilde(path: &Path) -> PathBuf {
    if !path.as_os_str().as_encoded_bytes().starts_with(b"~") {
        return path.to_path_buf();
    }

    let Some(home) = dirs::home_dir() else {
        return path.to_path_buf();
    };

    match path.to_str() {
        Some("~") => home,
        Some(s) if s.starts_with("~/") => home.join(&s[2..]),
        _ => path.to_path_buf(),
    }
}
