//! Live adapter for the `WorkOrderApi` port over HTTP.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::error::SubmitError;
use crate::ports::work_orders::{SubmitFuture, WorkOrderApi};
use crate::workorder::WorkOrder;

const API_KEY_HEADER: &str = "X-Api-Key";
const NO_DETAILS: &str = "could not read error response body";

/// Posts work orders to `{base_url}/work-orders` with an API key header.
pub struct LiveWorkOrderApi {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl LiveWorkOrderApi {
    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend failure).
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    /// Wraps an already configured HTTP client.
    #[must_use]
    pub fn with_client(client: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: format!("{}/work-orders", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    /// The URL documents are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl WorkOrderApi for LiveWorkOrderApi {
    fn submit<'a>(&'a self, order: &'a WorkOrder) -> SubmitFuture<'a> {
        Box::pin(async move {
            let reference = order.customer_reference.as_str();
            debug!(order_ref = reference, endpoint = %self.endpoint, "submitting work order");

            let response = self
                .client
                .post(&self.endpoint)
                .header(API_KEY_HEADER, &self.api_key)
                .header(ACCEPT, "application/json")
                .json(order)
                .send()
                .await
                .map_err(|e| {
                    error!(order_ref = reference, error = %e, "work order request failed");
                    SubmitError::Transport {
                        customer_reference: reference.to_string(),
                        message: e.to_string(),
                    }
                })?;

            let status = response.status();
            if status.is_success() {
                info!(order_ref = reference, status = status.as_u16(), "work order submitted");
                return Ok(());
            }

            let details = error_details(response.text().await.ok());
            error!(
                order_ref = reference,
                status = status.as_u16(),
                details = %details,
                "work order rejected"
            );
            Err(SubmitError::Rejected {
                customer_reference: reference.to_string(),
                status: status.as_u16(),
                details,
            })
        })
    }
}

/// Renders an error body: compact JSON when it parses, the raw text otherwise.
fn error_details(body: Option<String>) -> String {
    match body {
        Some(text) if !text.trim().is_empty() => serde_json::from_str::<serde_json::Value>(&text)
            .map_or(text, |json| json.to_string()),
        _ => NO_DETAILS.to_string(),
    }
}
