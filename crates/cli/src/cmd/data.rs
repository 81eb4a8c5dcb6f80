//! Data command implementation
//!
//! Write the data available to templates to stdout: a built-in `mirra`
//! table describing the run, followed by the `[data]` section of the
//! configuration.

use clap::{Args, ValueEnum};
use indexmap::IndexMap;
use mirra_core::platform::CURRENT_PLATFORM;
use serde_json::{Value, json};
use std::io::Write;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};

/// Output format for `mirra data`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DataFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// TOML
    Toml,
    /// YAML
    Yaml,
}

/// Data command arguments
#[derive(Debug, Args)]
pub struct DataCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = DataFormat::Json)]
    pub format: DataFormat,
}

impl Command for DataCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let data = collect(context);
        let rendered = render(&data, self.format)?;

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", rendered.trim_end())?;
        Ok(())
    }
}

/// Built-in values first, then user data in file order
fn collect(context: &RuntimeContext) -> IndexMap<String, Value> {
    let mut data = IndexMap::new();
    data.insert(
        "mirra".to_string(),
        json!({
            "sourceDir": context.source_dir().display().to_string(),
            "destDir": context.dest_dir().to_string(),
            "dotfilesDir": context.dotfiles_dir().to_string(),
            "os": CURRENT_PLATFORM.os,
            "family": CURRENT_PLATFORM.family,
            "arch": CURRENT_PLATFORM.arch,
        }),
    );

    for (key, value) in &context.config.data {
        if key == "mirra" {
            tracing::warn!("Ignoring user data key 'mirra': reserved for built-in values");
            continue;
        }
        data.insert(key.clone(), value.clone());
    }

    data
}

fn render(data: &IndexMap<String, Value>, format: DataFormat) -> Result<String> {
    match format {
        DataFormat::Json => {
            serde_json::to_string_pretty(data).map_err(|e| CommandError::Serialize {
                format: "json",
                message: e.to_string(),
            })
        }
        DataFormat::Toml => toml::to_string_pretty(data).map_err(|e| CommandError::Serialize {
            format: "toml",
            message: e.to_string(),
        }),
        DataFormat::Yaml => serde_yaml::to_string(data).map_err(|e| CommandError::Serialize {
            format: "yaml",
            message: e.to_string(),
        }),
    }
}
