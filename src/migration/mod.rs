//! End-to-end migration run.
//!
//! Files are processed strictly one after another, and so are the
//! submissions within a file. A failure inside one file never stops the
//! run: every listed file gets a verdict and is routed accordingly.

pub mod report;

use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::context::ServiceContext;
use crate::error::StoreError;
use crate::parser::parse_and_group;
use crate::store::{Destination, DirLayout, InboxStore};
use crate::transform::transform;

pub use report::{FailureReason, FileOutcome, MigrationReport, Verdict};

/// Runs one migration pass over the input directory.
///
/// # Errors
///
/// Returns an error only if the directories cannot be created; nothing
/// has been listed or moved at that point.
pub async fn run(ctx: &ServiceContext, dirs: &DirLayout) -> Result<MigrationReport, StoreError> {
    let run_id = Uuid::new_v4().to_string();
    let span = info_span!("migration", run_id = %run_id);
    run_files(ctx, dirs, run_id).instrument(span).await
}

async fn run_files(
    ctx: &ServiceContext,
    dirs: &DirLayout,
    run_id: String,
) -> Result<MigrationReport, StoreError> {
    info!("starting migration run");
    let store = InboxStore::new(ctx, dirs);
    store.initialize()?;

    let files = store.list_csv_files().unwrap_or_else(|e| {
        error!(error = %e, "could not list input directory");
        Vec::new()
    });
    if files.is_empty() {
        info!("no CSV files to process");
    }

    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        let span = info_span!("file", file = %file);
        outcomes.push(process_and_route(ctx, &store, file).instrument(span).await);
    }

    let report = MigrationReport { run_id, files: outcomes };
    info!(
        found = report.found(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "migration run finished"
    );
    Ok(report)
}

async fn process_and_route(
    ctx: &ServiceContext,
    store: &InboxStore<'_>,
    file: String,
) -> FileOutcome {
    info!("processing file");
    let tally = process_file(ctx, store, &file).await;

    let destination = match tally.verdict {
        Verdict::Success => {
            info!(submitted = tally.submitted, "file migrated");
            Destination::Processed
        }
        Verdict::Failure(reason) => {
            warn!(
                reason = %reason,
                submitted = tally.submitted,
                rejected = tally.rejected,
                "file failed"
            );
            Destination::Error
        }
    };
    let destination = store.move_to(&file, destination);

    FileOutcome {
        file,
        verdict: tally.verdict,
        submitted: tally.submitted,
        rejected: tally.rejected,
        destination,
    }
}

struct Tally {
    verdict: Verdict,
    submitted: usize,
    rejected: usize,
}

impl Tally {
    fn failed(reason: FailureReason) -> Self {
        Self { verdict: Verdict::Failure(reason), submitted: 0, rejected: 0 }
    }
}

/// Read → parse → transform → submit for one file.
async fn process_file(ctx: &ServiceContext, store: &InboxStore<'_>, file: &str) -> Tally {
    let content = match store.read(file) {
        Ok(content) => content,
        Err(e) => {
            error!(error = %e, "could not read file");
            return Tally::failed(FailureReason::Unreadable);
        }
    };

    let grouped = match parse_and_group(&content) {
        Ok(grouped) => grouped,
        Err(e) => {
            error!(error = %e, "could not parse file");
            return Tally::failed(FailureReason::Malformed);
        }
    };

    let orders = transform(grouped).orders;
    if orders.is_empty() {
        warn!("no valid work orders found, routing to error for review");
        return Tally::failed(FailureReason::NoValidWorkOrders);
    }

    info!(count = orders.len(), "submitting work orders");
    let mut submitted = 0;
    let mut rejected = 0;
    for order in &orders {
        match ctx.api.submit(order).await {
            Ok(()) => submitted += 1,
            Err(e) => {
                error!(order_ref = %order.customer_reference, error = %e, "submission failed");
                rejected += 1;
            }
        }
    }

    let verdict = if rejected == 0 {
        Verdict::Success
    } else {
        Verdict::Failure(FailureReason::SubmissionsFailed)
    };
    Tally { verdict, submitted, rejected }
}
