//! Row group → work-order document transformation.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::error::TransformError;
use crate::parser::GroupedRows;
use crate::validate::validate_work_order;
use crate::workorder::{Client, JobDetails, Location, RowGroup, Task, WorkOrder};

/// Output of transforming a whole file's groups.
#[derive(Debug, Default)]
pub struct Transformed {
    /// Documents ready for submission, in group order.
    pub orders: Vec<WorkOrder>,
    /// Groups that could not be transformed, in group order.
    pub dropped: Vec<TransformError>,
}

/// Transforms every group into a document.
///
/// A group that fails is logged and dropped; the remaining groups are
/// still transformed.
#[must_use]
pub fn transform(grouped: GroupedRows) -> Transformed {
    let groups = grouped.into_groups();
    info!(groups = groups.len(), "transforming work orders");

    let mut out = Transformed::default();
    for group in &groups {
        match transform_group(group) {
            Ok(order) => out.orders.push(order),
            Err(err) => {
                log_dropped(&err);
                out.dropped.push(err);
            }
        }
    }

    info!(
        transformed = out.orders.len(),
        dropped = out.dropped.len(),
        "transformation finished"
    );
    out
}

/// Builds and validates the document for one group.
///
/// Client, location and schedule come from the first row; each row
/// contributes one task, in row order.
///
/// # Errors
///
/// Fails when the group is empty, its date and time do not form a real
/// instant, or the assembled document breaks the target schema.
pub fn transform_group(group: &RowGroup) -> Result<WorkOrder, TransformError> {
    let Some(first) = group.rows.first() else {
        return Err(TransformError::EmptyGroup { order_ref: group.order_ref.clone() });
    };

    let tasks = group
        .rows
        .iter()
        .map(|row| Task {
            task_code: row.task_identifier.clone(),
            description: row.task_description.clone(),
            estimated_hours: row.task_hours_estimate,
        })
        .collect();

    let scheduled_for = scheduled_instant(&first.job_date, &first.job_time).map_err(|source| {
        TransformError::InvalidSchedule {
            order_ref: group.order_ref.clone(),
            date: first.job_date.clone(),
            time: first.job_time.clone(),
            source,
        }
    })?;

    let order = WorkOrder {
        customer_reference: first.order_ref.clone(),
        client: Client {
            name: first.client_org_name.clone(),
            contact_person: first.client_contact_name.clone(),
            phone: first.client_phone_num.clone(),
        },
        location: Location {
            full_address: first.site_full_address.clone(),
            instructions: first.site_notes.clone(),
        },
        job_details: JobDetails { scheduled_for, tasks },
    };

    validate_work_order(&order).map_err(|violations| TransformError::InvalidDocument {
        order_ref: group.order_ref.clone(),
        violations,
    })?;

    Ok(order)
}

/// Combines `YYYY-MM-DD` and `HH:MM` into a UTC instant with zero seconds.
///
/// # Errors
///
/// Returns the chrono parse error for impossible dates or times.
pub fn scheduled_instant(date: &str, time: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(&format!("{date}T{time}:00Z")).map(|dt| dt.with_timezone(&Utc))
}

fn log_dropped(err: &TransformError) {
    match err {
        TransformError::EmptyGroup { order_ref } => {
            warn!(order_ref = %order_ref, "skipping order with no rows");
        }
        TransformError::InvalidSchedule { order_ref, date, time, source } => {
            error!(
                order_ref = %order_ref,
                date = %date,
                time = %time,
                error = %source,
                "invalid schedule, dropping order"
            );
        }
        TransformError::InvalidDocument { order_ref, violations } => {
            error!(
                order_ref = %order_ref,
                errors = %violations,
                "assembled document failed validation, dropping order"
            );
        }
    }
}
