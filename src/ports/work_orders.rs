//! Work-order API port.

use std::future::Future;
use std::pin::Pin;

use crate::error::SubmitError;
use crate::workorder::WorkOrder;

/// Boxed future type alias used by [`WorkOrderApi`] to keep the trait dyn-compatible.
pub type SubmitFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SubmitError>> + Send + 'a>>;

/// Submits work-order documents to the downstream API.
pub trait WorkOrderApi: Send + Sync {
    /// Submits one document. Never retries.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Rejected`] for a non-2xx response and
    /// [`SubmitError::Transport`] when no response was received.
    fn submit<'a>(&'a self, order: &'a WorkOrder) -> SubmitFuture<'a>;
}
