//! Error types for the migration pipeline.
//!
//! Each failure kind carries the context needed to attribute it (file,
//! line, order reference, HTTP status) so diagnostics stay structured.

use std::path::PathBuf;

use thiserror::Error;

use crate::workorder::Violations;

/// Invalid or missing configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API key in any configuration layer.
    #[error("API_KEY is not set; the work-order API requires an API key")]
    MissingApiKey,
    /// The API base URL resolved to an empty string.
    #[error("API_BASE_URL is empty")]
    MissingBaseUrl,
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid YAML for [`ConfigLayer`](crate::config::ConfigLayer).
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Structural CSV failure. Aborts the file being parsed, never the run.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The CSV reader failed, e.g. on an unterminated quote.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    /// A record has a different number of fields than the header.
    #[error("malformed CSV at line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        /// Physical line on which the record starts.
        line: u64,
        /// Header field count.
        expected: usize,
        /// Record field count.
        found: usize,
    },
}

/// A row group that could not be turned into a work-order document.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The group has no rows.
    #[error("order {order_ref} has no rows")]
    EmptyGroup {
        /// Order reference of the group.
        order_ref: String,
    },
    /// Date and time do not combine into a real instant.
    #[error("order {order_ref}: invalid schedule (date: '{date}', time: '{time}'): {source}")]
    InvalidSchedule {
        /// Order reference of the group.
        order_ref: String,
        /// `job_date` of the first row.
        date: String,
        /// `job_time` of the first row.
        time: String,
        /// Underlying parse error.
        #[source]
        source: chrono::ParseError,
    },
    /// The assembled document broke the target schema.
    #[error("order {order_ref}: assembled document is invalid: {violations}")]
    InvalidDocument {
        /// Order reference of the group.
        order_ref: String,
        /// Every broken document rule.
        violations: Violations,
    },
}

impl TransformError {
    /// The order reference of the group that was dropped.
    #[must_use]
    pub fn order_ref(&self) -> &str {
        match self {
            Self::EmptyGroup { order_ref }
            | Self::InvalidSchedule { order_ref, .. }
            | Self::InvalidDocument { order_ref, .. } => order_ref,
        }
    }
}

/// A single work-order submission that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The API answered with a non-2xx status.
    #[error("API returned status {status} for {customer_reference}: {details}")]
    Rejected {
        /// Reference of the rejected document.
        customer_reference: String,
        /// HTTP status code.
        status: u16,
        /// Error body as compact JSON or raw text.
        details: String,
    },
    /// No response was received at all.
    #[error("request for {customer_reference} failed: {message}")]
    Transport {
        /// Reference of the document that was being sent.
        customer_reference: String,
        /// Transport error description.
        message: String,
    },
}

/// Failures of the inbound directory store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A directory could not be created.
    #[error("failed to create directory {path}: {message}")]
    Init {
        /// Directory path.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },
    /// The input directory could not be listed.
    #[error("failed to list {path}: {message}")]
    List {
        /// Directory path.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },
    /// An input file could not be read.
    #[error("failed to read {path}: {message}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },
}
