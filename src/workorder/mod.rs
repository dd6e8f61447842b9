//! Core types shared by every pipeline stage.
//!
//! Flat CSV rows come in as [`RawRow`], are validated into [`InputRow`],
//! grouped into [`RowGroup`]s by order reference, and finally assembled
//! into nested [`WorkOrder`] documents for the API.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column names of the inbound CSV format, in canonical order.
pub const CSV_COLUMNS: [&str; 11] = [
    "order_ref",
    "client_org_name",
    "client_contact_name",
    "client_phone_num",
    "site_full_address",
    "site_notes",
    "job_date",
    "job_time",
    "task_identifier",
    "task_description",
    "task_hours_estimate",
];

/// One CSV record as read from disk, before validation.
///
/// Every column is optional so that missing and empty values can be
/// reported together instead of failing on the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRow {
    /// `order_ref` column.
    pub order_ref: Option<String>,
    /// `client_org_name` column.
    pub client_org_name: Option<String>,
    /// `client_contact_name` column.
    pub client_contact_name: Option<String>,
    /// `client_phone_num` column.
    pub client_phone_num: Option<String>,
    /// `site_full_address` column.
    pub site_full_address: Option<String>,
    /// `site_notes` column.
    pub site_notes: Option<String>,
    /// `job_date` column.
    pub job_date: Option<String>,
    /// `job_time` column.
    pub job_time: Option<String>,
    /// `task_identifier` column.
    pub task_identifier: Option<String>,
    /// `task_description` column.
    pub task_description: Option<String>,
    /// `task_hours_estimate` column, unparsed.
    pub task_hours_estimate: Option<String>,
}

/// A validated CSV row: one task of one work order.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    /// Group key shared by every task of one work order.
    pub order_ref: String,
    /// Client organisation name.
    pub client_org_name: String,
    /// Contact person at the client.
    pub client_contact_name: String,
    /// Contact phone number.
    pub client_phone_num: String,
    /// Full address of the job site.
    pub site_full_address: String,
    /// Free-text site notes; empty when the column was blank.
    pub site_notes: String,
    /// `YYYY-MM-DD`
    pub job_date: String,
    /// `HH:MM`
    pub job_time: String,
    /// Task code.
    pub task_identifier: String,
    /// What the task involves.
    pub task_description: String,
    /// Always finite and strictly positive.
    pub task_hours_estimate: f64,
}

/// All validated rows sharing one order reference, in file order.
///
/// Client, site and schedule fields are read from the first row only.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup {
    /// Key shared by every row of the group.
    pub order_ref: String,
    /// Rows in file order. Never empty when built by the parser.
    pub rows: Vec<InputRow>,
}

impl RowGroup {
    /// Starts a group from its first row.
    #[must_use]
    pub fn new(first: InputRow) -> Self {
        Self { order_ref: first.order_ref.clone(), rows: vec![first] }
    }
}

/// The nested document submitted to the work-order API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    /// The `order_ref` the document was grouped under.
    pub customer_reference: String,
    /// Ordering client.
    pub client: Client,
    /// Job site.
    pub location: Location,
    /// Schedule and tasks.
    pub job_details: JobDetails,
}

/// Who ordered the work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Organisation name.
    pub name: String,
    /// Contact person.
    pub contact_person: String,
    /// Contact phone number.
    pub phone: String,
}

/// Where the work happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Full street address.
    pub full_address: String,
    /// Site notes, or empty.
    pub instructions: String,
}

/// When the work happens and what it consists of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    /// Job date and time combined, read as UTC.
    pub scheduled_for: DateTime<Utc>,
    /// One task per source row, in row order. Never empty.
    pub tasks: Vec<Task>,
}

/// A single unit of work within a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier from the source row.
    pub task_code: String,
    /// Task description.
    pub description: String,
    /// Estimated effort in hours.
    pub estimated_hours: f64,
}

/// One violated field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Column name, or dotted path for document fields (`jobDetails.tasks[0].taskCode`).
    pub field: String,
    /// What rule was broken.
    pub message: String,
    /// The offending value, when there was one.
    pub value: Option<String>,
}

impl FieldViolation {
    /// Creates a violation for `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>, value: Option<&str>) -> Self {
        Self { field: field.into(), message: message.into(), value: value.map(String::from) }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {} (got '{value}')", self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// Every rule a row or document broke, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(pub Vec<FieldViolation>);

impl Violations {
    /// Returns `true` when a violation was recorded for `field`.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    /// Names of the violated fields.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.field.as_str()).collect()
    }

    /// Returns `true` when nothing was violated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            violation.fmt(f)?;
        }
        Ok(())
    }
}
