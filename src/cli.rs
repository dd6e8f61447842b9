//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigLayer;

/// Top-level CLI parser for `workorder-migrate`.
#[derive(Debug, Parser)]
#[command(
    name = "workorder-migrate",
    version,
    about = "Migrate CSV work orders into the work-order API"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process every CSV file in the input directory and submit its work orders.
    Migrate(MigrateArgs),
    /// Parse and transform one CSV file offline, printing the resulting documents.
    Inspect {
        /// Path of the CSV file to inspect.
        file: PathBuf,
    },
}

/// Settings for a migration run. Flags override the config file.
#[derive(Debug, Default, Args)]
pub struct MigrateArgs {
    /// YAML file with default settings.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Base URL of the work-order API.
    #[arg(long, env = "API_BASE_URL", value_name = "URL")]
    pub api_base_url: Option<String>,
    /// API key sent as `X-Api-Key`.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Directory scanned for CSV files.
    #[arg(long, env = "INPUT_DIR", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,
    /// Directory receiving fully migrated files.
    #[arg(long, env = "PROCESSED_DIR", value_name = "DIR")]
    pub processed_dir: Option<PathBuf>,
    /// Directory receiving failed files.
    #[arg(long, env = "ERROR_DIR", value_name = "DIR")]
    pub error_dir: Option<PathBuf>,
    /// Per-request timeout in seconds.
    #[arg(long = "timeout", env = "REQUEST_TIMEOUT_SECS", value_name = "SECS")]
    pub request_timeout_secs: Option<u64>,
}

impl MigrateArgs {
    /// The settings given on the command line or through the environment.
    #[must_use]
    pub fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            api_base_url: self.api_base_url.clone(),
            api_key: self.api_key.clone(),
            input_dir: self.input_dir.clone(),
            processed_dir: self.processed_dir.clone(),
            error_dir: self.error_dir.clone(),
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}
