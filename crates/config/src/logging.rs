//! Logging configuration for the mirra CLI
//!
//! Compact terminal output on stderr plus an optional detailed log file,
//! using tracing.

use crate::Result;
use mirra_core::Error;
use std::fs::OpenOptions;
use std::path::Path;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// `RUST_LOG` overrides the default filter. The log file, when given, is
/// appended to and always receives debug output.
///
/// # Arguments
/// * `verbose` - Enable debug level logging (and timestamps)
/// * `log_file` - Optional path to write logs to a file
///
/// # Examples
/// ```ignore
/// // Basic usage with info level
/// init(false, None)?;
///
/// // Verbose mode, also writing to a file
/// init(true, Some(Path::new("mirra.log")))?;
/// ```
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "mirra={level},mirra_engine={level},mirra_config={level}"
            ))
        })
        .map_err(|e| Error::Message(format!("Invalid log filter: {e}")))?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_ansi(true);
    // No timestamps in normal mode
    let stderr_layer = if verbose {
        stderr_layer.boxed()
    } else {
        stderr_layer.without_time().boxed()
    };

    let file_layer = match log_file {
        Some(log_path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            Some(
                fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer.with_filter(env_filter))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Message(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}
