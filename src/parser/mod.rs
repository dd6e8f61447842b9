//! CSV ingestion and grouping.
//!
//! Rows are validated one at a time. Invalid rows are dropped with a
//! warning; malformed CSV framing aborts the whole document.

use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use crate::error::ParseError;
use crate::validate::validate_row;
use crate::workorder::{InputRow, RawRow, RowGroup, Violations, CSV_COLUMNS};

/// A row that failed validation and was left out of every group.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Physical 1-based line on which the record starts (the header is
    /// line 1). Blank lines and newlines inside quoted fields are counted.
    pub line: u64,
    /// Every rule the row broke.
    pub violations: Violations,
}

/// Valid rows grouped by order reference, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedRows {
    groups: Vec<RowGroup>,
    index: HashMap<String, usize>,
    rejected: Vec<RejectedRow>,
}

impl GroupedRows {
    /// Appends a row to its group, creating the group on first sight.
    pub fn push(&mut self, row: InputRow) {
        if let Some(&i) = self.index.get(&row.order_ref) {
            self.groups[i].rows.push(row);
        } else {
            self.index.insert(row.order_ref.clone(), self.groups.len());
            self.groups.push(RowGroup::new(row));
        }
    }

    /// Returns the group for `order_ref`, if any valid row carried it.
    #[must_use]
    pub fn get(&self, order_ref: &str) -> Option<&RowGroup> {
        self.index.get(order_ref).map(|&i| &self.groups[i])
    }

    /// Groups in order of first appearance.
    #[must_use]
    pub fn groups(&self) -> &[RowGroup] {
        &self.groups
    }

    /// Rows that were dropped during validation.
    #[must_use]
    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    /// Number of distinct order references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` when no valid row was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consumes the grouping, yielding groups in order of first appearance.
    #[must_use]
    pub fn into_groups(self) -> Vec<RowGroup> {
        self.groups
    }
}

impl FromIterator<InputRow> for GroupedRows {
    fn from_iter<I: IntoIterator<Item = InputRow>>(iter: I) -> Self {
        let mut grouped = Self::default();
        for row in iter {
            grouped.push(row);
        }
        grouped
    }
}

/// Parses a CSV document and groups its valid rows by `order_ref`.
///
/// Headers map columns by name and surrounding whitespace is trimmed.
/// Empty and whitespace-only lines are skipped; a record of empty fields
/// is validated like any other row. An empty or header-only document
/// yields an empty grouping.
///
/// # Errors
///
/// Returns a [`ParseError`] when the CSV framing itself is broken, such as
/// a record whose field count does not match the header.
pub fn parse_and_group(content: &str) -> Result<GroupedRows, ParseError> {
    let mut reader =
        ReaderBuilder::new().trim(Trim::All).flexible(true).from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    if !headers.is_empty() {
        let missing: Vec<&str> =
            CSV_COLUMNS.into_iter().filter(|c| !headers.iter().any(|h| h == *c)).collect();
        if !missing.is_empty() {
            warn!(missing = ?missing, "header is missing expected columns");
        }
    }
    let mut grouped = GroupedRows::default();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);

        if is_blank_line(&record) {
            continue;
        }
        if record.len() != headers.len() {
            return Err(ParseError::FieldCount {
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }

        let raw: RawRow = record.deserialize(Some(&headers))?;
        match validate_row(&raw) {
            Ok(row) => grouped.push(row),
            Err(violations) => {
                warn!(line, errors = %violations, "skipping invalid row");
                grouped.rejected.push(RejectedRow { line, violations });
            }
        }
    }

    info!(
        groups = grouped.len(),
        rejected = grouped.rejected.len(),
        "parsed and grouped work orders"
    );
    Ok(grouped)
}

/// A whitespace-only line trims down to a single empty field.
fn is_blank_line(record: &StringRecord) -> bool {
    record.len() == 1 && record.iter().all(str::is_empty)
}
