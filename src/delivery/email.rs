//! Email delivery via the SendGrid v3 mail-send API

use crate::delivery::{DeliveryAdapter, DeliveryFailure};
use async_trait::async_trait;
use serde::Serialize;

/// Default SendGrid API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

/// Subject line used for itinerary emails
const SUBJECT: &str = "Your Trip Itinerary";

#[derive(Serialize, Debug)]
struct MailSendRequest {
    personalizations: Vec<Personalization>,
    from: EmailAddress,
    subject: String,
    content: Vec<MailContent>,
}

#[derive(Serialize, Debug)]
struct Personalization {
    to: Vec<EmailAddress>,
}

#[derive(Serialize, Debug)]
struct EmailAddress {
    email: String,
}

#[derive(Serialize, Debug)]
struct MailContent {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

/// Sends the rendered itinerary to the traveler's email address
pub struct SendGridMailer {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    sender: String,
}

impl SendGridMailer {
    /// Create a mailer for the given SendGrid endpoint and credentials
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl DeliveryAdapter for SendGridMailer {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn deliver(&self, itinerary: &str, target: &str) -> Result<(), DeliveryFailure> {
        if self.api_key.is_empty() || self.sender.is_empty() {
            return Err(DeliveryFailure::NotConfigured(
                "SendGrid credentials are missing".to_string(),
            ));
        }

        let request_body = MailSendRequest {
            personalizations: vec![Personalization {
                to: vec![EmailAddress {
                    email: target.to_string(),
                }],
            }],
            from: EmailAddress {
                email: self.sender.clone(),
            },
            subject: SUBJECT.to_string(),
            content: vec![MailContent {
                content_type: "text/plain".to_string(),
                value: itinerary.to_string(),
            }],
        };

        tracing::info!(target = %target, "Sending itinerary email");

        let response = self
            .http
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(target = %target, "Itinerary email accepted");
            return Ok(());
        }

        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_string());
        tracing::warn!(
            status_code = status.as_u16(),
            detail = %detail,
            "Email delivery rejected"
        );
        Err(DeliveryFailure::Api {
            status: status.as_u16(),
            detail,
        })
    }
}
