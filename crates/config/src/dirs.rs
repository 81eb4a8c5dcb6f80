//! XDG directory utilities
//!
//! Mirra keeps its source tree under the XDG data directory by default:
//! `XDG_DATA_HOME` defaults to ~/.local/share.

use std::path::PathBuf;
use xdg::BaseDirectories;

/// Get the mirra data directory
///
/// Returns `$XDG_DATA_HOME/mirra` or `~/.local/share/mirra`
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    // xdg 3.0: get_*_home returns Option<PathBuf>
    BaseDirectories::with_prefix("mirra").get_data_home()
}

/// Get the default source directory for dotfiles
///
/// Same as [`data_dir`].
#[must_use]
pub fn default_source_dir() -> Option<PathBuf> {
    data_dir()
}

/// Get the default destination directory (the user's home)
#[must_use]
pub fn default_dest_dir() -> Option<PathBuf> {
    ::dirs::home_dir()
}
