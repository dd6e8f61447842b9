//! `workorder-migrate inspect` command.

use std::path::Path;

use tracing::warn;

use crate::adapters::live::LiveFileSystem;
use crate::parser::parse_and_group;
use crate::ports::FileSystem;
use crate::transform::transform;

/// Execute the `inspect` command.
///
/// Prints the documents a file would produce as a JSON array. Dropped
/// rows and groups are reported through the log. Nothing is submitted
/// or moved.
///
/// # Errors
///
/// Returns an error string if the file cannot be read or its CSV framing is broken.
pub fn run(file: &Path) -> Result<(), String> {
    let content = LiveFileSystem
        .read_to_string(file)
        .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    println!("{}", render(&content)?);
    Ok(())
}

/// Parses and transforms `content`, returning the documents as pretty JSON.
fn render(content: &str) -> Result<String, String> {
    let grouped = parse_and_group(content).map_err(|e| e.to_string())?;
    let rejected_rows = grouped.rejected().len();
    let transformed = transform(grouped);
    if rejected_rows > 0 || !transformed.dropped.is_empty() {
        warn!(
            rejected_rows,
            dropped_orders = transformed.dropped.len(),
            "some input was left out"
        );
    }
    serde_json::to_string_pretty(&transformed.orders)
        .map_err(|e| format!("failed to serialize work orders: {e}"))
}
