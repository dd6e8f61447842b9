//! `workorder-migrate migrate` command.

use crate::cli::MigrateArgs;
use crate::config::MigrationConfig;
use crate::context::ServiceContext;
use crate::migration::{self, MigrationReport};

/// Execute the `migrate` command.
///
/// Prints a one-line summary; per-file detail goes to the log.
///
/// # Errors
///
/// Returns an error string if configuration is invalid, the directories
/// cannot be prepared, or any file ended up in the error directory.
pub fn run(args: &MigrateArgs) -> Result<(), String> {
    let config =
        MigrationConfig::load(args.config.as_deref(), args.layer()).map_err(|e| e.to_string())?;
    let ctx = ServiceContext::live(&config).map_err(|e| e.to_string())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    let report =
        runtime.block_on(migration::run(&ctx, &config.dirs)).map_err(|e| e.to_string())?;

    println!("{}", summary(&report));
    if report.failed() > 0 {
        return Err(format!(
            "{} of {} files failed; see {}",
            report.failed(),
            report.found(),
            config.dirs.error.display()
        ));
    }
    Ok(())
}

fn summary(report: &MigrationReport) -> String {
    format!(
        "Found {} file(s): {} succeeded, {} failed",
        report.found(),
        report.succeeded(),
        report.failed()
    )
}
