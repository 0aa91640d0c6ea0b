//! Search provider contract layer
//!
//! Each external data source (flights, hotels, activities) implements the
//! uniform [`SearchProvider`] capability. All failure modes are normalized
//! into [`ProviderFailure`] values so that no provider error ever crosses
//! the orchestrator boundary as a panic or an unhandled propagation.

pub mod activities;
pub mod amadeus;
pub mod flights;
pub mod hotels;

use crate::trip::TripRequest;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// The section of the itinerary a provider fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Flight offers for the requested route and date
    Flights,
    /// Accommodation offers at the destination
    Hotels,
    /// Attraction and activity suggestions at the destination
    Activities,
}

impl ProviderKind {
    /// All kinds, in itinerary rendering order
    pub const ALL: [ProviderKind; 3] = [Self::Flights, Self::Hotels, Self::Activities];

    /// Mandatory providers invalidate the plan when they all fail;
    /// the supplementary activities provider only degrades it.
    pub fn is_mandatory(self) -> bool {
        matches!(self, Self::Flights | Self::Hotels)
    }

    /// Lowercase singular label ("flight", "hotel", "activity")
    pub fn label(self) -> &'static str {
        match self {
            Self::Flights => "flight",
            Self::Hotels => "hotel",
            Self::Activities => "activity",
        }
    }

    /// Capitalized singular label ("Flight", "Hotel", "Activity")
    pub fn title(self) -> &'static str {
        match self {
            Self::Flights => "Flight",
            Self::Hotels => "Hotel",
            Self::Activities => "Activity",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized provider failure
///
/// Every way a provider call can go wrong is represented here as data; the
/// orchestrator turns these into per-provider failure results, never into
/// request-level errors.
#[derive(Error, Debug)]
pub enum ProviderFailure {
    /// The HTTP request could not be completed
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials were rejected by the provider
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider returned a non-success status
    #[error("provider returned status {status}: {detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        detail: String,
    },

    /// The response body did not match the expected shape
    #[error("unexpected response shape: {0}")]
    Malformed(String),

    /// The provider has no usable credentials or endpoint configured
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Uniform capability interface implemented per provider
///
/// Adapters are stateless with respect to the orchestrator: nothing is
/// shared between calls beyond the underlying HTTP client pool.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Which itinerary section this provider fills
    fn kind(&self) -> ProviderKind;

    /// Search the provider for the given trip
    ///
    /// An empty payload is a successful "no results" outcome, distinct from
    /// a failure.
    async fn search(&self, trip: &TripRequest) -> Result<String, ProviderFailure>;
}

/// The single terminal outcome of one provider call attempt
///
/// Created once per attempt and immutable afterwards; owned by the
/// orchestrator's plan until rendering.
#[derive(Debug, Clone)]
pub struct ProviderResult {
    kind: ProviderKind,
    outcome: Result<String, String>,
}

impl ProviderResult {
    /// A successful call; an empty payload means "no results found"
    pub fn success(kind: ProviderKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            outcome: Ok(payload.into()),
        }
    }

    /// A failed call with a provider-tagged reason
    pub fn failure(kind: ProviderKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            outcome: Err(reason.into()),
        }
    }

    /// Which provider produced this result
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Whether the call succeeded (including empty "no results" payloads)
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Success payload, if any
    pub fn payload(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    /// Failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(|s| s.as_str())
    }

    /// One-line outcome summary for the event stream
    pub fn summary(&self) -> String {
        match &self.outcome {
            Ok(payload) if payload.is_empty() => {
                format!("Searched for {} options: no results found.", self.kind)
            }
            Ok(_) => format!("Searched for {} options.", self.kind),
            Err(reason) => format!("{} search failed: {}", self.kind.title(), reason),
        }
    }
}
