//! Configuration management
//!
//! This module handles loading mirra configuration from `.mirra.toml` in the
//! source directory.

use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the source directory
pub const CONFIG_FILE_NAME: &str = ".mirra.toml";

/// General configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Source directory path
    #[serde(default, rename = "srcDir")]
    pub src_dir: Option<PathBuf>,

    /// Destination directory path
    #[serde(default, rename = "dstDir")]
    pub dst_dir: Option<PathBuf>,

    /// Subdirectory within source directory where dotfiles are stored
    /// Defaults to "home" to separate dotfiles from repository metadata (.git, .mirra.toml)
    #[serde(default = "default_root_entry", rename = "rootEntry")]
    pub root_entry: PathBuf,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            src_dir: None,
            dst_dir: None,
            root_entry: default_root_entry(),
            color: default_color(),
        }
    }
}

/// Mirra configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General configuration section
    #[serde(default)]
    pub general: GeneralConfig,

    /// Arbitrary user data, printed by `mirra data`
    #[serde(default)]
    pub data: IndexMap<String, serde_json::Value>,
}

fn default_color() -> bool {
    true
}

fn default_root_entry() -> PathBuf {
    PathBuf::from("home")
}

impl Config {
    /// Load configuration from a file
    ///
    /// Relative paths are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or TOML parsing fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            mirra_core::Error::Message(format!(
                "Failed to read config file {}: {e}",
                path.as_ref().display()
            ))
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| {
            mirra_core::Error::Message(format!(
                "Failed to parse config file {}: {e}",
                path.as_ref().display()
            ))
        })?;

        if let Some(parent) = path.as_ref().parent() {
            config.resolve_relative_paths(parent);
        }

        Ok(config)
    }

    /// Load configuration from TOML string
    ///
    /// Paths are resolved relative to `source_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails
    pub fn from_toml_str(toml_content: &str, source_dir: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(toml_content)
            .map_err(|e| mirra_core::Error::Message(format!("Failed to parse config TOML: {e}")))?;

        config.resolve_relative_paths(source_dir);

        Ok(config)
    }

    /// Load configuration from source directory (`.mirra.toml`)
    ///
    /// A missing file is not an error: every setting has a default.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load_from_source(source_dir: &Path) -> Result<Self> {
        let config_path = source_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            tracing::debug!(
                "No {} in {}, using defaults",
                CONFIG_FILE_NAME,
                source_dir.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| {
            mirra_core::Error::Message(format!(
                "Failed to read config file {}: {e}",
                config_path.display()
            ))
        })?;

        Self::from_toml_str(&content, source_dir)
    }

    /// Resolve relative paths in configuration
    ///
    /// Expands `~` and joins relative paths onto `base_dir`.
    fn resolve_relative_paths(&mut self, base_dir: &Path) {
        if let Some(ref src_dir) = self.general.src_dir {
            self.general.src_dir = Some(Self::resolve_path(src_dir, base_dir));
        }
        if let Some(ref dst_dir) = self.general.dst_dir {
            self.general.dst_dir = Some(Self::resolve_path(dst_dir, base_dir));
        }
        // root_entry stays relative: it is joined onto the source directory
    }

    /// Resolve a single path: expand ~/ and resolve relative paths
    fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();

        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = ::dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~"
            && let Some(home) = ::dirs::home_dir()
        {
            return home;
        }

        if path.is_relative() {
            base_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Get the dotfiles directory
    ///
    /// Returns `source_dir/root_entry` (defaults to `source_dir/home`).
    #[must_use]
    pub fn dotfiles_dir(&self, source_dir: &Path) -> PathBuf {
        source_dir.join(&self.general.root_entry)
    }

    /// Get the source directory from general config
    #[must_use]
    pub fn source_dir(&self) -> Option<&PathBuf> {
        self.general.src_dir.as_ref()
    }

    /// Get the destination directory from general config
    #[must_use]
    pub fn dest_dir(&self) -> Option<&PathBuf> {
        self.general.dst_dir.as_ref()
    }
}
