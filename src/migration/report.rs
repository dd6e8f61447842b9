//! Per-file verdicts and the run summary.

use std::fmt;
use std::path::PathBuf;

/// Why a file was routed to the error directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The file could not be read.
    Unreadable,
    /// The CSV framing was broken.
    Malformed,
    /// Parsing and transformation produced no documents.
    NoValidWorkOrders,
    /// At least one submission did not succeed.
    SubmissionsFailed,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unreadable => "unreadable file",
            Self::Malformed => "malformed CSV",
            Self::NoValidWorkOrders => "no valid work orders",
            Self::SubmissionsFailed => "one or more submissions failed",
        })
    }
}

/// Success or failure classification of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every extracted work order was accepted.
    Success,
    /// The file needs operator review.
    Failure(FailureReason),
}

impl Verdict {
    /// Returns `true` for [`Verdict::Success`].
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// File name within the input directory.
    pub file: String,
    /// Success, or why the file failed.
    pub verdict: Verdict,
    /// Documents the API accepted.
    pub submitted: usize,
    /// Documents the API rejected or never received.
    pub rejected: usize,
    /// Where the file was moved; `None` if the move failed.
    pub destination: Option<PathBuf>,
}

/// Summary of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Identifier attached to every log line of the run.
    pub run_id: String,
    /// One entry per listed file, in processing order.
    pub files: Vec<FileOutcome>,
}

impl MigrationReport {
    /// Number of candidate files found.
    #[must_use]
    pub fn found(&self) -> usize {
        self.files.len()
    }

    /// Number of files routed to processed.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.verdict.is_success()).count()
    }

    /// Number of files routed to error.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.found() - self.succeeded()
    }

    /// Looks up the outcome for a file name.
    #[must_use]
    pub fn outcome(&self, file: &str) -> Option<&FileOutcome> {
        self.files.iter().find(|f| f.file == file)
    }
}
