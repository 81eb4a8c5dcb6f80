//! Command trait for the mirra CLI
//!
//! Every subcommand implements [`Command`] and receives the shared
//! [`RuntimeContext`], so commands can be executed and tested the same way.

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for all mirra commands
///
/// Commands can specify their return type via the `Output` associated type.
/// `chattr` and `remove` report how many paths they touched; `data` returns
/// nothing.
///
/// # Example
///
/// ```rust,ignore
/// use crate::command::Command;
/// use crate::common::RuntimeContext;
/// use crate::error::Result;
/// use clap::Args;
///
/// #[derive(Debug, Args)]
/// pub struct MyCommand {
///     #[arg(short, long)]
///     pub some_flag: bool,
/// }
///
/// impl Command for MyCommand {
///     type Output = ();
///
///     fn execute(&self, context: &RuntimeContext) -> Result<()> {
///         // context.config, context.dotfiles_dir(), context.system()
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the command fails to execute.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
