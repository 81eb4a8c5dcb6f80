//! Error types for CLI commands
//!
//! Commands return [`CommandError`] so the failure class survives up to
//! `main`; context added along the way uses `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Error data for `PathNotUnderDestination`
///
/// Separated to allow boxing and reduce `CommandError` enum size
#[derive(Debug)]
pub struct PathNotUnderDestinationError {
    /// The path that is not under the destination directory
    pub path: PathBuf,
    /// The destination directory path
    pub dest_dir: PathBuf,
}

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// Path not under destination directory
    #[error("Path {} is not under destination directory {}", .0.path.display(), .0.dest_dir.display())]
    PathNotUnderDestination(Box<PathNotUnderDestinationError>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Source tree or planning error
    #[error(transparent)]
    Engine(#[from] mirra_engine::Error),

    /// Output could not be serialized
    #[error("Failed to serialize data as {format}: {message}")]
    Serialize {
        /// Requested output format
        format: &'static str,
        /// Serializer message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<mirra_core::Error> for CommandError {
    fn from(err: mirra_core::Error) -> Self {
        Self::Engine(err.into())
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

impl CommandError {
    /// Create a `PathNotUnderDestination` error
    #[must_use]
    pub fn path_not_under_dest(path: PathBuf, dest_dir: PathBuf) -> Self {
        Self::PathNotUnderDestination(Box::new(PathNotUnderDestinationError { path, dest_dir }))
    }

    /// Create a `ConfigError` from any error type
    pub fn config<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::ConfigError(Box::new(err))
    }
}
