//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod validate;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::ValidatorError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), ValidatorError> {
    match cli.command {
        Commands::Validate(args) => validate::run(&args).await,
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => Ok(version::run(&args)?),
    }
}
