//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Credentials are read once at startup; a missing
//! credential disables the feature it backs rather than failing the boot.

use crate::delivery::email;
use crate::extractor::gemini;
use crate::orchestrator::OrchestratorConfig;
use crate::providers::{activities, amadeus};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Gemini extraction configuration
    pub gemini: GeminiConfig,
    /// Amadeus (flights and hotels) configuration
    pub amadeus: AmadeusConfig,
    /// SerpAPI (activities) configuration
    pub serpapi: SerpApiConfig,
    /// SendGrid (email delivery) configuration
    pub sendgrid: SendGridConfig,
    /// Orchestrator timeouts and toggles
    pub orchestrator: OrchestratorConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Gemini extraction configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key; empty disables extraction (every request will fail fast)
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// API base URL
    pub base_url: String,
}

/// Amadeus configuration
#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// API base URL (test or production environment)
    pub base_url: String,
}

/// SerpAPI configuration
#[derive(Debug, Clone)]
pub struct SerpApiConfig {
    /// API key; empty disables activity search
    pub api_key: String,
    /// API base URL
    pub base_url: String,
}

/// SendGrid configuration
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// API key; absent disables email delivery
    pub api_key: Option<String>,
    /// Verified sender address; absent disables email delivery
    pub sender: Option<String>,
    /// API base URL
    pub base_url: String,
}

fn env_secs(name: &str, default_secs: u64) -> Duration {
    Duration::from_secs(
        env::var(name)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(default_secs),
    )
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            gemini: GeminiConfig {
                api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| gemini::DEFAULT_MODEL.to_string()),
                base_url: gemini::DEFAULT_BASE_URL.to_string(),
            },
            amadeus: AmadeusConfig {
                client_id: env::var("AMADEUS_CLIENT_ID").unwrap_or_default(),
                client_secret: env::var("AMADEUS_CLIENT_SECRET").unwrap_or_default(),
                base_url: env::var("AMADEUS_BASE_URL")
                    .unwrap_or_else(|_| amadeus::DEFAULT_BASE_URL.to_string()),
            },
            serpapi: SerpApiConfig {
                api_key: env::var("SERP_API_KEY").unwrap_or_default(),
                base_url: activities::DEFAULT_BASE_URL.to_string(),
            },
            sendgrid: SendGridConfig {
                api_key: env::var("SENDGRID_API_KEY").ok(),
                sender: env::var("SENDER_EMAIL").ok(),
                base_url: email::DEFAULT_BASE_URL.to_string(),
            },
            orchestrator: OrchestratorConfig {
                extraction_timeout: env_secs("EXTRACTION_TIMEOUT_SECS", 30),
                flight_timeout: env_secs("FLIGHT_TIMEOUT_SECS", 20),
                hotel_timeout: env_secs("HOTEL_TIMEOUT_SECS", 20),
                activity_timeout: env_secs("ACTIVITY_TIMEOUT_SECS", 20),
                delivery_timeout: env_secs("DELIVERY_TIMEOUT_SECS", 15),
                email_enabled: env_flag("EMAIL_DELIVERY_ENABLED", true),
                calendar_enabled: env_flag("CALENDAR_DELIVERY_ENABLED", true),
                max_prompt_length: env::var("MAX_PROMPT_LENGTH")
                    .ok()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(10_000),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
