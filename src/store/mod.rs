//! Inbound directory store.
//!
//! Candidate files arrive in the input directory and leave it exactly
//! once per run, renamed into either the processed or the error
//! directory. All I/O goes through `ctx.fs`.
//!
//! ```text
//! sftp_input/       candidate *.csv files
//! sftp_processed/   files whose work orders were all accepted
//! sftp_error/       files that failed in whole or in part
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::context::ServiceContext;
use crate::error::StoreError;

/// Locations of the three well-known directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirLayout {
    /// Where candidate files are picked up.
    pub input: PathBuf,
    /// Where fully migrated files end up.
    pub processed: PathBuf,
    /// Where failed files end up for operator review.
    pub error: PathBuf,
}

impl Default for DirLayout {
    fn default() -> Self {
        Self {
            input: PathBuf::from("./sftp_input"),
            processed: PathBuf::from("./sftp_processed"),
            error: PathBuf::from("./sftp_error"),
        }
    }
}

impl DirLayout {
    /// Places all three directories under `root` with their default names.
    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self {
            input: root.join("sftp_input"),
            processed: root.join("sftp_processed"),
            error: root.join("sftp_error"),
        }
    }

    fn dir_for(&self, destination: Destination) -> &Path {
        match destination {
            Destination::Processed => &self.processed,
            Destination::Error => &self.error,
        }
    }
}

/// Where a file goes once it has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Every work order in the file was accepted.
    Processed,
    /// The file needs operator review.
    Error,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Processed => "processed",
            Self::Error => "error",
        })
    }
}

/// Lists, reads and routes files in a [`DirLayout`].
pub struct InboxStore<'a> {
    ctx: &'a ServiceContext,
    layout: &'a DirLayout,
}

impl<'a> InboxStore<'a> {
    /// Creates a store over the given directories.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, layout: &'a DirLayout) -> Self {
        Self { ctx, layout }
    }

    /// Creates the input, processed and error directories if missing.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first directory that could not be created.
    pub fn initialize(&self) -> Result<(), StoreError> {
        for dir in [&self.layout.input, &self.layout.processed, &self.layout.error] {
            self.ctx.fs.create_dir_all(dir).map_err(|e| StoreError::Init {
                path: dir.clone(),
                message: e.to_string(),
            })?;
        }
        info!(
            input = %self.layout.input.display(),
            "input, processed and error directories are ready"
        );
        Ok(())
    }

    /// Lists files in the input directory ending in `.csv`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the input directory cannot be listed.
    pub fn list_csv_files(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.ctx.fs.list_dir(&self.layout.input).map_err(|e| StoreError::List {
            path: self.layout.input.clone(),
            message: e.to_string(),
        })?;
        let files: Vec<String> =
            entries.into_iter().filter(|name| name.to_lowercase().ends_with(".csv")).collect();
        info!(count = files.len(), files = ?files, "found CSV files");
        Ok(files)
    }

    /// Reads the full content of an input file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not valid UTF-8.
    pub fn read(&self, name: &str) -> Result<String, StoreError> {
        let path = self.layout.input.join(name);
        self.ctx
            .fs
            .read_to_string(&path)
            .map_err(|e| StoreError::Read { path, message: e.to_string() })
    }

    /// Moves an input file into the processed or error directory.
    ///
    /// A name already taken at the destination gets a UTC timestamp
    /// appended. A failed move is logged and leaves the file in the input
    /// directory for the next run.
    ///
    /// Returns the final path, or `None` if the move failed.
    pub fn move_to(&self, name: &str, destination: Destination) -> Option<PathBuf> {
        let source = self.layout.input.join(name);
        let dir = self.layout.dir_for(destination);
        let mut target = dir.join(name);
        if self.ctx.fs.exists(&target) {
            target = dir.join(stamped_name(name, self.ctx.clock.now()));
        }

        match self.ctx.fs.rename(&source, &target) {
            Ok(()) => {
                info!(file = name, to = %target.display(), "moved file to {destination}");
                Some(target)
            }
            Err(e) => {
                error!(
                    file = name,
                    to = %target.display(),
                    error = %e,
                    "failed to move file to {destination}"
                );
                None
            }
        }
    }
}

/// `orders.csv` → `orders.20240815T100000123.csv`
fn stamped_name(name: &str, now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y%m%dT%H%M%S%3f");
    let path = Path::new(name);
    match (path.file_stem().and_then(|s| s.to_str()), path.extension().and_then(|e| e.to_str())) {
        (Some(stem), Some(ext)) => format!("{stem}.{stamp}.{ext}"),
        _ => format!("{name}.{stamp}"),
    }
}
