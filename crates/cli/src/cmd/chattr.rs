//! Chattr command implementation
//!
//! Change the private, empty, executable or template attributes of managed
//! targets by renaming their entries in the source directory.

use clap::Args;
use mirra_engine::modifier::ModifierSet;
use mirra_engine::plan::RenamePlan;
use mirra_engine::state::SourceState;
use std::path::PathBuf;

use crate::build_filter_paths;
use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Chattr command arguments
#[derive(Debug, Args)]
pub struct ChattrCommand {
    /// Attribute modifiers, e.g. `+private,-template` or `p,x`
    #[arg(value_name = "MODIFIERS", allow_hyphen_values = true)]
    pub modifiers: String,

    /// Targets to change, as paths in the destination directory
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<PathBuf>,
}

impl Command for ChattrCommand {
    /// Number of entries renamed
    type Output = usize;

    fn execute(&self, context: &RuntimeContext) -> Result<usize> {
        // Nothing is read before the expression is known to be valid
        let modifiers = ModifierSet::parse(&self.modifiers)?;
        let targets = build_filter_paths(&self.targets, context.dest_dir())?;

        let state = SourceState::read(context.dotfiles_dir().clone())?;
        let entries = state.resolve(&targets)?;
        let plan = RenamePlan::build(entries, &modifiers, state.root())?;

        plan.execute(&context.system())?;

        if !context.mode.dry_run {
            if plan.is_empty() {
                println!("{} Attributes already up to date", context.done_marker());
            } else {
                println!(
                    "{} Changed attributes of {} {}",
                    context.done_marker(),
                    plan.len(),
                    if plan.len() == 1 { "entry" } else { "entries" }
                );
            }
        }

        tracing::debug!("chattr {} on {} targets", self.modifiers, targets.len());
        Ok(plan.len())
    }
}
