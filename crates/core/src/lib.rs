//! Core types and utilities for mirra
//!
//! This is the foundation crate that all other mirra crates depend on.
//! It provides:
//! - Path types (`AbsPath`, `RelPath`, `SourceRelPath`)
//! - Base error types
//! - Platform detection
//!
//! This crate has no dependencies on other mirra crates.

pub mod error;
pub mod path;
pub mod platform;

pub use error::{Error, Result};
