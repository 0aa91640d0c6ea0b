//! Orchestrator timing and delivery knobs

use crate::providers::ProviderKind;
use std::time::Duration;

/// Timeouts and toggles governing one trip-planning run
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// How long the extraction call may take before the request fails
    pub extraction_timeout: Duration,
    /// Flight search deadline; expiry fails only the flight slot
    pub flight_timeout: Duration,
    /// Hotel search deadline; expiry fails only the hotel slot
    pub hotel_timeout: Duration,
    /// Activity search deadline; expiry fails only the activity slot
    pub activity_timeout: Duration,
    /// Deadline per delivery attempt (email, calendar)
    pub delivery_timeout: Duration,
    /// Whether email delivery is attempted when the trip carries an address
    pub email_enabled: bool,
    /// Whether calendar delivery is attempted when the trip requests it
    pub calendar_enabled: bool,
    /// Longest accepted prompt, in characters
    pub max_prompt_length: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            extraction_timeout: Duration::from_secs(30),
            flight_timeout: Duration::from_secs(20),
            hotel_timeout: Duration::from_secs(20),
            activity_timeout: Duration::from_secs(20),
            delivery_timeout: Duration::from_secs(15),
            email_enabled: true,
            calendar_enabled: true,
            max_prompt_length: 10_000,
        }
    }
}

impl OrchestratorConfig {
    /// The search deadline that applies to the given provider
    pub fn provider_timeout(&self, kind: ProviderKind) -> Duration {
        match kind {
            ProviderKind::Flights => self.flight_timeout,
            ProviderKind::Hotels => self.hotel_timeout,
            ProviderKind::Activities => self.activity_timeout,
        }
    }
}
