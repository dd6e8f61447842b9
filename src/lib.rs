//! Core library entry for the `workorder-migrate` CLI.
//!
//! The pipeline reads CSV batches from an input directory, validates and
//! groups their rows by order reference, transforms each group into a
//! nested work-order document, submits the documents to the work-order
//! API, and routes each file to a processed or error directory.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod migration;
pub mod parser;
pub mod ports;
pub mod store;
pub mod transform;
pub mod validate;
pub mod workorder;

#[cfg(test)]
mod testing;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
/// `--help` and `--version` print to stdout and succeed.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return err.print().map_err(|e| e.to_string());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}
