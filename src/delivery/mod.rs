//! Delivery adapters (email, calendar)
//!
//! Best-effort side effects performed after a plan is finalized. Failures
//! here are logged by the orchestrator and never escalate to request
//! failure.

pub mod calendar;
pub mod email;

use async_trait::async_trait;
use thiserror::Error;

/// Normalized delivery failure
#[derive(Error, Debug)]
pub enum DeliveryFailure {
    /// The HTTP request could not be completed
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The delivery service returned a non-success status
    #[error("delivery service returned status {status}: {detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        detail: String,
    },

    /// The adapter has no usable credentials configured
    #[error("delivery not configured: {0}")]
    NotConfigured(String),

    /// The delivery channel has no real implementation yet
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// Best-effort delivery capability (email, calendar)
#[async_trait]
pub trait DeliveryAdapter: Send + Sync {
    /// Short channel name for logs and event messages ("email", "calendar")
    fn name(&self) -> &'static str;

    /// Deliver the rendered itinerary to `target`
    async fn deliver(&self, itinerary: &str, target: &str) -> Result<(), DeliveryFailure>;
}
