//! Flight search provider backed by the Amadeus flight-offers API

use crate::providers::amadeus::AmadeusClient;
use crate::providers::{ProviderFailure, ProviderKind, SearchProvider};
use crate::trip::TripRequest;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Maximum number of offers to include in the summary
const MAX_OFFERS: usize = 3;

#[derive(Deserialize)]
struct FlightOffersResponse {
    #[serde(default)]
    data: Vec<FlightOffer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightOffer {
    price: OfferPrice,
    #[serde(default)]
    validating_airline_codes: Vec<String>,
    #[serde(default)]
    itineraries: Vec<FlightItinerary>,
}

#[derive(Deserialize)]
struct OfferPrice {
    total: String,
    currency: String,
}

#[derive(Deserialize)]
struct FlightItinerary {
    #[serde(default)]
    segments: Vec<FlightSegment>,
}

#[derive(Deserialize)]
struct FlightSegment {
    departure: SegmentPoint,
    arrival: SegmentPoint,
}

#[derive(Deserialize)]
struct SegmentPoint {
    at: String,
}

/// Searches Amadeus flight offers for the requested route and departure date
pub struct FlightSearchProvider {
    amadeus: Arc<AmadeusClient>,
}

impl FlightSearchProvider {
    /// Create a provider sharing the given Amadeus client
    pub fn new(amadeus: Arc<AmadeusClient>) -> Self {
        Self { amadeus }
    }

    fn summarize(offers: &[FlightOffer]) -> String {
        let mut lines = vec!["Top flight options found:".to_string()];
        for offer in offers.iter().take(MAX_OFFERS) {
            let carrier = offer
                .validating_airline_codes
                .first()
                .map(String::as_str)
                .unwrap_or("unknown carrier");
            let segments = offer.itineraries.first().map(|i| i.segments.as_slice());
            let departs = segments
                .and_then(|s| s.first())
                .map(|s| clock_time(&s.departure.at))
                .unwrap_or("?");
            let arrives = segments
                .and_then(|s| s.last())
                .map(|s| clock_time(&s.arrival.at))
                .unwrap_or("?");
            lines.push(format!(
                "- Flight with carrier {} departing at {}, arriving at {}. Price: {} {}.",
                carrier, departs, arrives, offer.price.total, offer.price.currency
            ));
        }
        lines.join("\n")
    }
}

/// Time-of-day portion of an ISO timestamp, or the raw value if it has none
fn clock_time(timestamp: &str) -> &str {
    timestamp.split('T').nth(1).unwrap_or(timestamp)
}

#[async_trait]
impl SearchProvider for FlightSearchProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Flights
    }

    async fn search(&self, trip: &TripRequest) -> Result<String, ProviderFailure> {
        let query = [
            ("originLocationCode", trip.origin().to_string()),
            ("destinationLocationCode", trip.destination().to_string()),
            ("departureDate", trip.departure_date().to_string()),
            ("adults", trip.travelers().to_string()),
            ("max", MAX_OFFERS.to_string()),
        ];

        tracing::info!(
            origin = %trip.origin(),
            destination = %trip.destination(),
            departure = %trip.departure_date(),
            "Searching flight offers"
        );

        let body = self.amadeus.get("/v2/shopping/flight-offers", &query).await?;
        let parsed: FlightOffersResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::Malformed(format!("flight offers response: {e}")))?;

        if parsed.data.is_empty() {
            return Ok(String::new());
        }
        Ok(Self::summarize(&parsed.data))
    }
}
