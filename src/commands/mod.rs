//! Command dispatch and handlers.

pub mod inspect;
pub mod migrate;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Migrate(args) => migrate::run(args),
        Command::Inspect { file } => inspect::run(file),
    }
}
