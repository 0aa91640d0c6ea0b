//! Hotel search provider backed by the Amadeus hotel-offers API
//!
//! Resolves the destination to a city code first, then fetches offers for
//! the stay dates. An unknown city or an empty offer list is a successful
//! "no results" outcome, not a failure.

use crate::providers::amadeus::AmadeusClient;
use crate::providers::{ProviderFailure, ProviderKind, SearchProvider};
use crate::trip::TripRequest;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Maximum number of hotels to include in the summary
const MAX_HOTELS: usize = 5;

#[derive(Deserialize)]
struct CityLookupResponse {
    #[serde(default)]
    data: Vec<CityEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CityEntry {
    iata_code: String,
}

#[derive(Deserialize)]
struct HotelOffersResponse {
    #[serde(default)]
    data: Vec<HotelOffer>,
}

#[derive(Deserialize)]
struct HotelOffer {
    hotel: HotelInfo,
    #[serde(default)]
    offers: Vec<RoomOffer>,
}

#[derive(Deserialize)]
struct HotelInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    address: HotelAddress,
}

#[derive(Deserialize, Default)]
struct HotelAddress {
    #[serde(default)]
    lines: Vec<String>,
}

#[derive(Deserialize)]
struct RoomOffer {
    price: RoomPrice,
}

#[derive(Deserialize)]
struct RoomPrice {
    #[serde(default)]
    total: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

/// Searches Amadeus hotel offers at the destination for the stay dates
pub struct HotelSearchProvider {
    amadeus: Arc<AmadeusClient>,
}

impl HotelSearchProvider {
    /// Create a provider sharing the given Amadeus client
    pub fn new(amadeus: Arc<AmadeusClient>) -> Self {
        Self { amadeus }
    }

    async fn city_code(&self, destination: &str) -> Result<Option<String>, ProviderFailure> {
        let query = [
            ("keyword", destination.to_string()),
            ("subType", "CITY".to_string()),
        ];
        let body = self.amadeus.get("/v1/reference-data/locations", &query).await?;
        let parsed: CityLookupResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::Malformed(format!("city lookup response: {e}")))?;
        Ok(parsed.data.into_iter().next().map(|city| city.iata_code))
    }

    fn summarize(destination: &str, offers: &[HotelOffer]) -> String {
        let mut lines = vec![format!("Hotel options in {}:", destination)];
        for offer in offers.iter().take(MAX_HOTELS) {
            let name = offer.hotel.name.as_deref().unwrap_or("Unnamed hotel");
            let address = offer
                .hotel
                .address
                .lines
                .first()
                .map(String::as_str)
                .unwrap_or("address unavailable");
            let rating = offer.hotel.rating.as_deref().unwrap_or("unrated");
            let price = offer
                .offers
                .first()
                .map(|room| {
                    format!(
                        "{} {}",
                        room.price.total.as_deref().unwrap_or("N/A"),
                        room.price.currency.as_deref().unwrap_or("")
                    )
                    .trim()
                    .to_string()
                })
                .unwrap_or_else(|| "N/A".to_string());
            lines.push(format!(
                "- {} at {}. Rating: {}. Price: {}.",
                name, address, rating, price
            ));
        }
        lines.join("\n")
    }
}

#[async_trait]
impl SearchProvider for HotelSearchProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Hotels
    }

    async fn search(&self, trip: &TripRequest) -> Result<String, ProviderFailure> {
        tracing::info!(
            destination = %trip.destination(),
            check_in = %trip.departure_date(),
            check_out = %trip.return_date(),
            "Searching hotel offers"
        );

        let Some(city_code) = self.city_code(trip.destination()).await? else {
            tracing::debug!(destination = %trip.destination(), "No city match for destination");
            return Ok(String::new());
        };

        let mut query = vec![
            ("cityCode", city_code),
            ("checkInDate", trip.departure_date().to_string()),
            ("checkOutDate", trip.return_date().to_string()),
            ("adults", trip.travelers().to_string()),
            ("roomQuantity", "1".to_string()),
        ];
        if let Some(budget) = trip.budget() {
            query.push(("currency", budget.currency.clone()));
        }

        let body = self.amadeus.get("/v3/shopping/hotel-offers", &query).await?;
        let parsed: HotelOffersResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::Malformed(format!("hotel offers response: {e}")))?;

        if parsed.data.is_empty() {
            return Ok(String::new());
        }
        Ok(Self::summarize(trip.destination(), &parsed.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::{Budget, TripFields, TripRequest};
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn sample_trip() -> TripRequest {
        TripRequest::from_fields(TripFields {
            origin: "DEL".to_string(),
            destination: "Goa".to_string(),
            departure_date: "2030-06-10".to_string(),
            return_date: "2030-06-15".to_string(),
            travelers: 2,
            interests: vec![],
            budget: Some(Budget {
                amount: 50000.0,
                currency: "INR".to_string(),
            }),
            user_email: None,
            add_to_calendar: false,
        })
        .unwrap()
    }

    fn token_mock_body() -> &'static str {
        r#"{"access_token": "t", "expires_in": 1799}"#
    }

    #[tokio::test]
    #[serial]
    async fn test_search_returns_summary() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/security/oauth2/token")
            .with_status(200)
            .with_body(token_mock_body())
            .create_async()
            .await;
        server
            .mock("GET", "/v1/reference-data/locations")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("keyword".into(), "Goa".into()),
                Matcher::UrlEncoded("subType".into(), "CITY".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"data": [{"iataCode": "GOI"}]}"#)
            .create_async()
            .await;
        let offers_mock = server
            .mock("GET", "/v3/shopping/hotel-offers")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("cityCode".into(), "GOI".into()),
                Matcher::UrlEncoded("checkInDate".into(), "2030-06-10".into()),
                Matcher::UrlEncoded("checkOutDate".into(), "2030-06-15".into()),
                Matcher::UrlEncoded("currency".into(), "INR".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"data": [{
                    "hotel": {
                        "name": "Seaside Resort",
                        "rating": "4",
                        "address": {"lines": ["Calangute Beach Road"]}
                    },
                    "offers": [{"price": {"total": "32000.00", "currency": "INR"}}]
                }]}"#,
            )
            .create_async()
            .await;

        let amadeus = Arc::new(AmadeusClient::new(
            reqwest::Client::new(),
            server.url(),
            "id",
            "secret",
        ));
        let provider = HotelSearchProvider::new(amadeus);
        let payload = provider.search(&sample_trip()).await.unwrap();

        offers_mock.assert_async().await;
        assert!(payload.contains("Hotel options in Goa:"));
        assert!(payload.contains("Seaside Resort"));
        assert!(payload.contains("32000.00 INR"));
    }

    #[tokio::test]
    #[serial]
    async fn test_unknown_city_is_empty_success() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/security/oauth2/token")
            .with_status(200)
            .with_body(token_mock_body())
            .create_async()
            .await;
        server
            .mock("GET", "/v1/reference-data/locations")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;

        let amadeus = Arc::new(AmadeusClient::new(
            reqwest::Client::new(),
            server.url(),
            "id",
            "secret",
        ));
        let provider = HotelSearchProvider::new(amadeus);
        let payload = provider.search(&sample_trip()).await.unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_summarize_handles_missing_fields() {
        let offers: HotelOffersResponse =
            serde_json::from_str(r#"{"data": [{"hotel": {}, "offers": []}]}"#).unwrap();
        let summary = HotelSearchProvider::summarize("Goa", &offers.data);
        assert!(summary.contains("Unnamed hotel"));
        assert!(summary.contains("unrated"));
        assert!(summary.contains("Price: N/A."));
    }
}
