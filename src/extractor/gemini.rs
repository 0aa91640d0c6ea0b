//! Gemini-backed trip request extractor
//!
//! Calls the Gemini generateContent API in JSON response mode and validates
//! the returned fields into a [`TripRequest`]. The extraction prompt pins
//! today's date so relative phrases like "next month" resolve correctly, and
//! instructs the model to emit the `"UNKNOWN"` sentinel for required fields
//! it cannot determine rather than omitting them.

use crate::extractor::TripExtractor;
use crate::trip::{ExtractionFailure, TripFields, TripRequest, UNKNOWN_FIELD};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default Gemini API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default extraction model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Serialize, Debug)]
struct ApiRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize, Debug)]
struct RequestPart {
    text: String,
}

#[derive(Serialize, Debug)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Deserialize, Debug)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, alias = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Debug)]
struct PromptFeedback {
    #[serde(default, alias = "blockReason")]
    block_reason: Option<String>,
}

/// Trip request extractor backed by the Gemini generateContent API
pub struct GeminiExtractor {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiExtractor {
    /// Create an extractor for the given endpoint, key and model
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn extraction_prompt(prompt: &str) -> String {
        let today = chrono::Local::now().date_naive();
        format!(
            r#"You are a meticulous data extraction assistant. Analyze a traveler's request and extract key information into a JSON object. Do not be conversational; output only the JSON object.

Rules:
1. Today's date is {today}. Resolve relative dates like "next month" or "tomorrow" against it.
2. You MUST provide string values for "origin", "destination", "departure_date" and "return_date". Use the 3-letter IATA city code for origin and destination (e.g., San Francisco is SFO, London is LON).
3. If a required value cannot be determined from the request, use the string "{UNKNOWN_FIELD}" as its value. Never use null and never omit the key.
4. "travelers" is the number of people traveling (1 if unstated). "interests" is a list of short tags describing what the traveler cares about. "budget" is an object {{"amount": number, "currency": "CODE"}} or null. "user_email" is the address the plan should be emailed to, or null. "add_to_calendar" is true only if the traveler asked for a calendar entry.

Traveler request:
"{prompt}"

Output a JSON object with exactly these keys: origin, destination, departure_date (YYYY-MM-DD), return_date (YYYY-MM-DD), travelers, interests, budget, user_email, add_to_calendar."#
        )
    }

    async fn call_model(&self, prompt: String) -> Result<String, ExtractionFailure> {
        if self.api_key.is_empty() {
            return Err(ExtractionFailure::Service(
                "extraction API key is empty".to_string(),
            ));
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let request_body = ApiRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        tracing::debug!(model = %self.model, "Calling extraction model");

        let response = self
            .http
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                ExtractionFailure::Service(format!("failed to reach extraction model: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            tracing::error!(
                status_code = status.as_u16(),
                error_body = %body,
                "Extraction model returned error status"
            );
            if status.as_u16() == 429 {
                return Err(ExtractionFailure::Service(
                    "the extraction model is currently busy; please try again in a few minutes"
                        .to_string(),
                ));
            }
            return Err(ExtractionFailure::Service(format!(
                "extraction model returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: ApiResponse = response.json().await.map_err(|e| {
            ExtractionFailure::Service(format!("failed to parse extraction model response: {e}"))
        })?;

        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(ExtractionFailure::Service(format!(
                    "extraction model blocked the prompt: {reason}"
                )));
            }
        }

        let text = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ExtractionFailure::Service(
                "extraction model returned no content".to_string(),
            ));
        }
        Ok(text)
    }

    fn parse_fields(text: &str) -> Result<TripFields, ExtractionFailure> {
        // Models sometimes wrap JSON in markdown fences despite the mime hint
        let cleaned = text
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();
        serde_json::from_str(cleaned).map_err(|e| ExtractionFailure::Unparseable(e.to_string()))
    }

    fn validate(fields: TripFields) -> Result<TripRequest, ExtractionFailure> {
        let required: [(&'static str, &str); 4] = [
            ("origin", &fields.origin),
            ("destination", &fields.destination),
            ("departure date", &fields.departure_date),
            ("return date", &fields.return_date),
        ];
        for (name, value) in required {
            if value.trim() == UNKNOWN_FIELD {
                return Err(ExtractionFailure::MissingField(name));
            }
        }
        TripRequest::from_fields(fields)
    }
}

#[async_trait]
impl TripExtractor for GeminiExtractor {
    async fn extract(&self, prompt: &str) -> Result<TripRequest, ExtractionFailure> {
        let text = self.call_model(Self::extraction_prompt(prompt)).await?;
        let fields = Self::parse_fields(&text)?;
        Self::validate(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn candidate_body(fields_json: &str) -> String {
        let escaped = fields_json.replace('"', "\\\"");
        format!(
            r#"{{"candidates": [{{"content": {{"parts": [{{"text": "{escaped}"}}]}}}}]}}"#
        )
    }

    #[tokio::test]
    #[serial]
    async fn test_extract_success() {
        let mut server = Server::new_async().await;
        let fields = r#"{"origin": "DEL", "destination": "GOI", "departure_date": "2030-06-10", "return_date": "2030-06-15", "travelers": 2, "interests": ["beaches"], "budget": null, "user_email": "user@example.com", "add_to_calendar": false}"#;
        let mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_body(candidate_body(fields))
            .create_async()
            .await;

        let extractor = GeminiExtractor::new(
            reqwest::Client::new(),
            server.url(),
            "test-key",
            DEFAULT_MODEL,
        );
        let trip = extractor.extract("Plan a trip").await.unwrap();

        mock.assert_async().await;
        assert_eq!(trip.origin(), "DEL");
        assert_eq!(trip.destination(), "GOI");
        assert_eq!(trip.travelers(), 2);
        assert_eq!(trip.email(), Some("user@example.com"));
    }

    #[tokio::test]
    #[serial]
    async fn test_unknown_destination_is_missing_field() {
        let mut server = Server::new_async().await;
        let fields = r#"{"origin": "DEL", "destination": "UNKNOWN", "departure_date": "2030-06-10", "return_date": "2030-06-15"}"#;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(candidate_body(fields))
            .create_async()
            .await;

        let extractor = GeminiExtractor::new(
            reqwest::Client::new(),
            server.url(),
            "test-key",
            DEFAULT_MODEL,
        );
        let err = extractor.extract("Plan a trip somewhere").await.unwrap_err();
        assert_eq!(err, ExtractionFailure::MissingField("destination"));
    }

    #[tokio::test]
    #[serial]
    async fn test_rate_limit_is_service_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error": "rate limit exceeded"}"#)
            .create_async()
            .await;

        let extractor = GeminiExtractor::new(
            reqwest::Client::new(),
            server.url(),
            "test-key",
            DEFAULT_MODEL,
        );
        let err = extractor.extract("Plan a trip").await.unwrap_err();
        assert!(matches!(err, ExtractionFailure::Service(_)));
        assert!(err.to_string().contains("busy"));
    }

    #[tokio::test]
    #[serial]
    async fn test_blocked_prompt_is_service_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": [], "prompt_feedback": {"block_reason": "SAFETY"}}"#)
            .create_async()
            .await;

        let extractor = GeminiExtractor::new(
            reqwest::Client::new(),
            server.url(),
            "test-key",
            DEFAULT_MODEL,
        );
        let err = extractor.extract("Plan a trip").await.unwrap_err();
        assert!(err.to_string().contains("blocked"));
    }

    #[tokio::test]
    async fn test_empty_api_key_fails_without_network() {
        let extractor =
            GeminiExtractor::new(reqwest::Client::new(), "http://unused", "", DEFAULT_MODEL);
        let err = extractor.extract("Plan a trip").await.unwrap_err();
        assert!(err.to_string().contains("API key is empty"));
    }

    #[test]
    fn test_parse_fields_strips_markdown_fences() {
        let text = "```json\n{\"origin\": \"DEL\", \"destination\": \"GOI\", \"departure_date\": \"2030-06-10\", \"return_date\": \"2030-06-15\"}\n```";
        let fields = GeminiExtractor::parse_fields(text).unwrap();
        assert_eq!(fields.origin, "DEL");
        assert_eq!(fields.travelers, 1);
    }

    #[test]
    fn test_parse_fields_rejects_non_json() {
        let err = GeminiExtractor::parse_fields("not json at all").unwrap_err();
        assert!(matches!(err, ExtractionFailure::Unparseable(_)));
    }
}
