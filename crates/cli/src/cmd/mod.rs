//! CLI command implementations
//!
//! This module contains all command implementations for the mirra CLI.

pub mod chattr;
pub mod data;
pub mod remove;
