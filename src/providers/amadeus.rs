//! Shared Amadeus API client
//!
//! Handles OAuth2 client-credential token acquisition and authenticated GET
//! requests for the flight and hotel providers. Tokens are reused until
//! shortly before expiry so concurrent searches within a request share one
//! token fetch.

use crate::providers::ProviderFailure;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default Amadeus API base URL (test environment)
pub const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

/// Refresh the token this long before it actually expires
const TOKEN_EXPIRY_SLACK: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Authenticated Amadeus HTTP client shared by the flight and hotel providers
pub struct AmadeusClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl AmadeusClient {
    /// Create a client for the given Amadeus environment and credentials
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, ProviderFailure> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ProviderFailure::NotConfigured(
                "Amadeus credentials are missing".to_string(),
            ));
        }

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!(base_url = %self.base_url, "Requesting Amadeus access token");
        let response = self
            .http
            .post(format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            return Err(ProviderFailure::Auth(format!(
                "token request returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::Malformed(format!("token response: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_SLACK);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }

    /// Authenticated GET returning the raw response body on success
    ///
    /// # Errors
    /// Normalizes HTTP transport errors, authentication rejections, and
    /// non-success statuses into [`ProviderFailure`] values.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, ProviderFailure> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderFailure::Malformed(format!("response body: {e}")))?;

        match status.as_u16() {
            200..=299 => Ok(body),
            401 | 403 => Err(ProviderFailure::Auth(format!(
                "status {}: {}",
                status.as_u16(),
                body
            ))),
            code => Err(ProviderFailure::Api {
                status: code,
                detail: body,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn token_body() -> &'static str {
        r#"{"access_token": "test-token", "expires_in": 1799}"#
    }

    #[tokio::test]
    #[serial]
    async fn test_get_fetches_token_then_resource() {
        let mut server = Server::new_async().await;
        let token_mock = server
            .mock("POST", "/v1/security/oauth2/token")
            .with_status(200)
            .with_body(token_body())
            .expect(1)
            .create_async()
            .await;
        let resource_mock = server
            .mock("GET", "/v2/test-resource")
            .match_header("authorization", "Bearer test-token")
            .match_query(Matcher::UrlEncoded("q".into(), "x".into()))
            .with_status(200)
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;

        let client = AmadeusClient::new(reqwest::Client::new(), server.url(), "id", "secret");
        let body = client
            .get("/v2/test-resource", &[("q", "x".to_string())])
            .await
            .unwrap();

        token_mock.assert_async().await;
        resource_mock.assert_async().await;
        assert_eq!(body, r#"{"data": []}"#);
    }

    #[tokio::test]
    #[serial]
    async fn test_token_is_reused_across_calls() {
        let mut server = Server::new_async().await;
        let token_mock = server
            .mock("POST", "/v1/security/oauth2/token")
            .with_status(200)
            .with_body(token_body())
            .expect(1)
            .create_async()
            .await;
        let resource_mock = server
            .mock("GET", "/v2/test-resource")
            .with_status(200)
            .with_body("{}")
            .expect(2)
            .create_async()
            .await;

        let client = AmadeusClient::new(reqwest::Client::new(), server.url(), "id", "secret");
        client.get("/v2/test-resource", &[]).await.unwrap();
        client.get("/v2/test-resource", &[]).await.unwrap();

        token_mock.assert_async().await;
        resource_mock.assert_async().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_rejected_credentials_become_auth_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/security/oauth2/token")
            .with_status(401)
            .with_body(r#"{"error": "invalid_client"}"#)
            .create_async()
            .await;

        let client = AmadeusClient::new(reqwest::Client::new(), server.url(), "id", "bad-secret");
        let err = client.get("/v2/test-resource", &[]).await.unwrap_err();
        assert!(matches!(err, ProviderFailure::Auth(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_without_network() {
        let client = AmadeusClient::new(reqwest::Client::new(), "http://unused", "", "");
        let err = client.get("/v2/test-resource", &[]).await.unwrap_err();
        assert!(matches!(err, ProviderFailure::NotConfigured(_)));
    }
}
