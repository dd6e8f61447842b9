//! Field rules for inbound rows and outbound documents.
//!
//! Validation never stops at the first broken rule: every violated
//! field is collected so a rejected row can be fixed in one pass.

use std::sync::LazyLock;

use regex::Regex;

use crate::workorder::{FieldViolation, InputRow, RawRow, Violations, WorkOrder};

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("time pattern is valid"));

/// Validates one flat CSV record.
///
/// # Errors
///
/// Returns every violated field rule when the row is not usable.
pub fn validate_row(raw: &RawRow) -> Result<InputRow, Violations> {
    let mut violations = Violations::default();

    let order_ref = required(&mut violations, "order_ref", raw.order_ref.as_deref());
    let client_org_name =
        required(&mut violations, "client_org_name", raw.client_org_name.as_deref());
    let client_contact_name =
        required(&mut violations, "client_contact_name", raw.client_contact_name.as_deref());
    let client_phone_num =
        required(&mut violations, "client_phone_num", raw.client_phone_num.as_deref());
    let site_full_address =
        required(&mut violations, "site_full_address", raw.site_full_address.as_deref());
    let site_notes = raw.site_notes.clone().unwrap_or_default();
    let job_date = matching(
        &mut violations,
        "job_date",
        raw.job_date.as_deref(),
        &DATE_RE,
        "invalid job_date format (YYYY-MM-DD)",
    );
    let job_time = matching(
        &mut violations,
        "job_time",
        raw.job_time.as_deref(),
        &TIME_RE,
        "invalid job_time format (HH:MM)",
    );
    let task_identifier =
        required(&mut violations, "task_identifier", raw.task_identifier.as_deref());
    let task_description =
        required(&mut violations, "task_description", raw.task_description.as_deref());
    let task_hours_estimate = positive_hours(&mut violations, raw.task_hours_estimate.as_deref());

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(InputRow {
        order_ref,
        client_org_name,
        client_contact_name,
        client_phone_num,
        site_full_address,
        site_notes,
        job_date,
        job_time,
        task_identifier,
        task_description,
        task_hours_estimate,
    })
}

/// Checks an assembled document against the target schema.
///
/// # Errors
///
/// Returns every violated rule, keyed by the document's camelCase field path.
pub fn validate_work_order(order: &WorkOrder) -> Result<(), Violations> {
    let mut violations = Violations::default();

    non_empty(&mut violations, "customerReference", &order.customer_reference);
    non_empty(&mut violations, "client.name", &order.client.name);
    non_empty(&mut violations, "client.contactPerson", &order.client.contact_person);
    non_empty(&mut violations, "client.phone", &order.client.phone);
    non_empty(&mut violations, "location.fullAddress", &order.location.full_address);

    if order.job_details.tasks.is_empty() {
        violations.push(FieldViolation::new(
            "jobDetails.tasks",
            "at least one task is required",
            None,
        ));
    }
    for (i, task) in order.job_details.tasks.iter().enumerate() {
        non_empty(&mut violations, &format!("jobDetails.tasks[{i}].taskCode"), &task.task_code);
        non_empty(
            &mut violations,
            &format!("jobDetails.tasks[{i}].description"),
            &task.description,
        );
        if !(task.estimated_hours.is_finite() && task.estimated_hours > 0.0) {
            violations.push(FieldViolation::new(
                format!("jobDetails.tasks[{i}].estimatedHours"),
                "estimated hours must be a positive number",
                Some(&task.estimated_hours.to_string()),
            ));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn required(violations: &mut Violations, field: &str, value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            violations.push(FieldViolation::new(field, format!("{field} is required"), None));
            String::new()
        }
    }
}

fn matching(
    violations: &mut Violations,
    field: &str,
    value: Option<&str>,
    pattern: &Regex,
    message: &str,
) -> String {
    match value {
        Some(v) if pattern.is_match(v) => v.to_string(),
        Some(v) => {
            violations.push(FieldViolation::new(field, message, Some(v)));
            String::new()
        }
        None => {
            violations.push(FieldViolation::new(field, format!("{field} is required"), None));
            String::new()
        }
    }
}

fn positive_hours(violations: &mut Violations, value: Option<&str>) -> f64 {
    const FIELD: &str = "task_hours_estimate";

    let Some(text) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        violations.push(FieldViolation::new(FIELD, "task_hours_estimate is required", None));
        return 0.0;
    };
    match text.parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours > 0.0 => hours,
        Ok(_) => {
            violations.push(FieldViolation::new(
                FIELD,
                "task_hours_estimate must be a positive number",
                Some(text),
            ));
            0.0
        }
        Err(_) => {
            violations.push(FieldViolation::new(
                FIELD,
                "task_hours_estimate must be a number",
                Some(text),
            ));
            0.0
        }
    }
}

fn non_empty(violations: &mut Violations, field: &str, value: &str) {
    if value.is_empty() {
        violations.push(FieldViolation::new(field, "must not be empty", None));
    }
}
