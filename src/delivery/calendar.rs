//! Calendar delivery placeholder
//!
//! Real calendar sync needs a user-consented OAuth flow spanning the
//! frontend and backend. Until that exists this adapter logs the event it
//! would create and reports a failure, which the orchestrator records as a
//! non-fatal warning.

use crate::delivery::{DeliveryAdapter, DeliveryFailure};
use async_trait::async_trait;

/// Placeholder calendar adapter
#[derive(Default)]
pub struct CalendarAdapter;

impl CalendarAdapter {
    /// Create the placeholder adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeliveryAdapter for CalendarAdapter {
    fn name(&self) -> &'static str {
        "calendar"
    }

    async fn deliver(&self, _itinerary: &str, target: &str) -> Result<(), DeliveryFailure> {
        tracing::warn!(
            target = %target,
            "Calendar sync requested but no calendar integration is configured"
        );
        Err(DeliveryFailure::NotImplemented(
            "calendar sync is not available yet".to_string(),
        ))
    }
}
