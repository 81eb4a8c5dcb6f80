//! Configuration management for mirra
//!
//! This crate handles:
//! - Configuration loading from `.mirra.toml`
//! - XDG directory management
//! - Logging initialization

pub mod config;
pub mod dirs;
pub mod logging;

// Re-export error types from core
pub use mirra_core::{Error, Result};

// Re-export main types
pub use config::{CONFIG_FILE_NAME, Config, GeneralConfig};
pub use dirs::{data_dir, default_dest_dir, default_source_dir};
