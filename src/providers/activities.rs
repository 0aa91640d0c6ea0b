//! Activity and attraction search backed by the SerpAPI web search API

use crate::providers::{ProviderFailure, ProviderKind, SearchProvider};
use crate::trip::TripRequest;
use async_trait::async_trait;
use serde::Deserialize;

/// Default SerpAPI base URL
pub const DEFAULT_BASE_URL: &str = "https://serpapi.com";

/// Maximum number of suggestions to include in the summary
const MAX_RESULTS: usize = 5;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: Option<String>,
}

/// Searches the web for attractions, food and cultural highlights at the
/// destination, biased by the traveler's stated interests
pub struct ActivitySearchProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ActivitySearchProvider {
    /// Create a provider for the given SerpAPI endpoint and key
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn query_for(trip: &TripRequest) -> String {
        let mut query = format!(
            "top attractions, local food to try and cultural highlights in {}",
            trip.destination()
        );
        if !trip.interests().is_empty() {
            query.push_str(" for travelers interested in ");
            query.push_str(&trip.interests().join(", "));
        }
        query
    }

    fn summarize(destination: &str, results: &[OrganicResult]) -> String {
        let mut lines = vec![format!("Ideas for your stay in {}:", destination)];
        for result in results.iter().take(MAX_RESULTS) {
            match result.snippet.as_deref() {
                Some(snippet) if !snippet.is_empty() => {
                    lines.push(format!("- {}: {}", result.title, snippet));
                }
                _ => lines.push(format!("- {}", result.title)),
            }
        }
        lines.join("\n")
    }
}

#[async_trait]
impl SearchProvider for ActivitySearchProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Activities
    }

    async fn search(&self, trip: &TripRequest) -> Result<String, ProviderFailure> {
        if self.api_key.is_empty() {
            return Err(ProviderFailure::NotConfigured(
                "SerpAPI key is missing".to_string(),
            ));
        }

        let query = Self::query_for(trip);
        tracing::info!(destination = %trip.destination(), "Searching activity suggestions");

        let response = self
            .http
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("engine", "google"),
                ("q", query.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderFailure::Malformed(format!("response body: {e}")))?;

        match status.as_u16() {
            200..=299 => {}
            401 | 403 => {
                return Err(ProviderFailure::Auth(format!(
                    "status {}: {}",
                    status.as_u16(),
                    body
                )))
            }
            code => {
                return Err(ProviderFailure::Api {
                    status: code,
                    detail: body,
                })
            }
        }

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::Malformed(format!("search response: {e}")))?;

        if parsed.organic_results.is_empty() {
            return Ok(String::new());
        }
        Ok(Self::summarize(trip.destination(), &parsed.organic_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::{TripFields, TripRequest};
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn sample_trip(interests: Vec<String>) -> TripRequest {
        TripRequest::from_fields(TripFields {
            origin: "DEL".to_string(),
            destination: "Goa".to_string(),
            departure_date: "2030-06-10".to_string(),
            return_date: "2030-06-15".to_string(),
            travelers: 2,
            interests,
            budget: None,
            user_email: None,
            add_to_calendar: false,
        })
        .unwrap()
    }

    #[test]
    fn test_query_includes_interests() {
        let trip = sample_trip(vec!["beaches".to_string(), "seafood".to_string()]);
        let query = ActivitySearchProvider::query_for(&trip);
        assert!(query.contains("in Goa"));
        assert!(query.contains("interested in beaches, seafood"));
    }

    #[tokio::test]
    #[serial]
    async fn test_search_returns_summary() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("engine".into(), "google".into()),
                Matcher::UrlEncoded("api_key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"organic_results": [
                    {"title": "Dudhsagar Falls", "snippet": "A four-tiered waterfall."},
                    {"title": "Old Goa churches"}
                ]}"#,
            )
            .create_async()
            .await;

        let provider =
            ActivitySearchProvider::new(reqwest::Client::new(), server.url(), "test-key");
        let payload = provider.search(&sample_trip(vec![])).await.unwrap();

        mock.assert_async().await;
        assert!(payload.contains("Ideas for your stay in Goa:"));
        assert!(payload.contains("Dudhsagar Falls: A four-tiered waterfall."));
        assert!(payload.contains("- Old Goa churches"));
    }

    #[tokio::test]
    #[serial]
    async fn test_no_results_is_empty_success() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/search.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"organic_results": []}"#)
            .create_async()
            .await;

        let provider =
            ActivitySearchProvider::new(reqwest::Client::new(), server.url(), "test-key");
        let payload = provider.search(&sample_trip(vec![])).await.unwrap();
        assert!(payload.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let provider = ActivitySearchProvider::new(reqwest::Client::new(), "http://unused", "");
        let err = provider.search(&sample_trip(vec![])).await.unwrap_err();
        assert!(matches!(err, ProviderFailure::NotConfigured(_)));
    }
}
