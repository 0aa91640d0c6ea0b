//! Trip-planning orchestration core
//!
//! Drives one request end to end: extraction, concurrent provider fan-out,
//! plan aggregation, itinerary rendering and best-effort delivery. Progress
//! and the terminal outcome are pushed into an event sink as they happen;
//! the core never talks HTTP to the caller directly.

pub mod config;
pub mod events;
pub mod itinerary;
pub mod plan;

pub use config::OrchestratorConfig;
pub use events::Event;

use crate::config::Config;
use crate::delivery::email::SendGridMailer;
use crate::delivery::{calendar::CalendarAdapter, DeliveryAdapter};
use crate::extractor::{gemini::GeminiExtractor, TripExtractor};
use crate::providers::activities::ActivitySearchProvider;
use crate::providers::amadeus::AmadeusClient;
use crate::providers::flights::FlightSearchProvider;
use crate::providers::hotels::HotelSearchProvider;
use crate::providers::{ProviderResult, SearchProvider};
use crate::trip::TripRequest;
use plan::{Completeness, Plan};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Terminal error content when no usable plan could be assembled
const PLAN_FAILED_MESSAGE: &str = "unable to build a plan: flights and hotels unavailable";

/// Coordinates one trip-planning request from prompt to terminal event
pub struct Orchestrator {
    extractor: Arc<dyn TripExtractor>,
    providers: Vec<Arc<dyn SearchProvider>>,
    email: Option<Arc<dyn DeliveryAdapter>>,
    calendar: Option<Arc<dyn DeliveryAdapter>>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Assemble an orchestrator from explicit collaborators
    pub fn new(
        extractor: Arc<dyn TripExtractor>,
        providers: Vec<Arc<dyn SearchProvider>>,
        email: Option<Arc<dyn DeliveryAdapter>>,
        calendar: Option<Arc<dyn DeliveryAdapter>>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            extractor,
            providers,
            email,
            calendar,
            config,
        }
    }

    /// Wire up the production collaborators from application config
    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        let extractor = Arc::new(GeminiExtractor::new(
            http.clone(),
            config.gemini.base_url.clone(),
            config.gemini.api_key.clone(),
            config.gemini.model.clone(),
        ));

        let amadeus = Arc::new(AmadeusClient::new(
            http.clone(),
            config.amadeus.base_url.clone(),
            config.amadeus.client_id.clone(),
            config.amadeus.client_secret.clone(),
        ));

        let providers: Vec<Arc<dyn SearchProvider>> = vec![
            Arc::new(FlightSearchProvider::new(amadeus.clone())),
            Arc::new(HotelSearchProvider::new(amadeus)),
            Arc::new(ActivitySearchProvider::new(
                http.clone(),
                config.serpapi.base_url.clone(),
                config.serpapi.api_key.clone(),
            )),
        ];

        let email: Option<Arc<dyn DeliveryAdapter>> =
            match (&config.sendgrid.api_key, &config.sendgrid.sender) {
                (Some(api_key), Some(sender)) => Some(Arc::new(SendGridMailer::new(
                    http,
                    config.sendgrid.base_url.clone(),
                    api_key.clone(),
                    sender.clone(),
                ))),
                _ => {
                    tracing::warn!("SendGrid not configured; email delivery disabled");
                    None
                }
            };

        Self::new(
            extractor,
            providers,
            email,
            Some(Arc::new(CalendarAdapter::new())),
            config.orchestrator.clone(),
        )
    }

    /// Longest prompt this orchestrator accepts
    pub fn max_prompt_length(&self) -> usize {
        self.config.max_prompt_length
    }

    /// Run one trip-planning request to completion
    ///
    /// Emits ordered progress events into `events` and exactly one terminal
    /// event (a Result or an Error), unless the receiving side goes away
    /// first, in which case the run stops early and emits nothing further.
    pub async fn run(&self, prompt: &str, events: mpsc::Sender<Event>) {
        if !events::emit(&events, Event::log("Parsing your trip request...")).await {
            return;
        }

        let trip = match timeout(
            self.config.extraction_timeout,
            self.extractor.extract(prompt),
        )
        .await
        {
            Ok(Ok(trip)) => trip,
            Ok(Err(failure)) => {
                tracing::warn!(reason = %failure, "Trip extraction failed");
                events::emit(
                    &events,
                    Event::error(format!("Could not understand the trip request: {failure}")),
                )
                .await;
                return;
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.config.extraction_timeout.as_secs(),
                    "Trip extraction timed out"
                );
                events::emit(
                    &events,
                    Event::error(format!(
                        "Trip extraction timed out after {}s",
                        self.config.extraction_timeout.as_secs()
                    )),
                )
                .await;
                return;
            }
        };

        tracing::info!(
            origin = trip.origin(),
            destination = trip.destination(),
            departure = %trip.departure_date(),
            travelers = trip.travelers(),
            "Trip request extracted"
        );

        if !events::emit(
            &events,
            Event::log(format!(
                "Searching flights, hotels and activities for {} to {}...",
                trip.origin(),
                trip.destination()
            )),
        )
        .await
        {
            return;
        }

        let mut plan = self.search_all(&trip, &events).await;
        plan.seal();

        if plan.completeness() == Completeness::Failed {
            events::emit(&events, Event::error(PLAN_FAILED_MESSAGE)).await;
            return;
        }

        let itinerary = itinerary::render(&trip, &plan);

        if self.config.email_enabled {
            if let (Some(mailer), Some(address)) = (&self.email, trip.email()) {
                if !self
                    .run_delivery(mailer.as_ref(), &itinerary, address, &events)
                    .await
                {
                    return;
                }
            }
        }

        if self.config.calendar_enabled && trip.calendar_sync() {
            if let Some(calendar) = &self.calendar {
                if !self
                    .run_delivery(calendar.as_ref(), &itinerary, trip.destination(), &events)
                    .await
                {
                    return;
                }
            }
        }

        events::emit(&events, Event::result(itinerary)).await;
    }

    /// Fan out to every provider concurrently and collect the plan
    ///
    /// Each provider runs in its own task under its own deadline; a slow or
    /// failing provider only ever fails its own slot. Returns the unsealed
    /// plan with every slot recorded.
    async fn search_all(&self, trip: &TripRequest, events: &mpsc::Sender<Event>) -> Plan {
        let (tx, mut rx) = mpsc::channel::<ProviderResult>(self.providers.len().max(1));

        for provider in &self.providers {
            let provider = provider.clone();
            let trip = trip.clone();
            let deadline = self.config.provider_timeout(provider.kind());
            let tx = tx.clone();
            tokio::spawn(async move {
                let kind = provider.kind();
                let result = match timeout(deadline, provider.search(&trip)).await {
                    Ok(Ok(payload)) => ProviderResult::success(kind, payload),
                    Ok(Err(failure)) => {
                        tracing::warn!(provider = %kind, reason = %failure, "Provider search failed");
                        ProviderResult::failure(kind, failure.to_string())
                    }
                    Err(_) => {
                        tracing::warn!(
                            provider = %kind,
                            timeout_secs = deadline.as_secs(),
                            "Provider search timed out"
                        );
                        ProviderResult::failure(
                            kind,
                            format!("timed out after {}s", deadline.as_secs()),
                        )
                    }
                };
                // receiver dropping just means the run ended early
                let _ = tx.send(result).await;
            });
        }
        drop(tx);

        let mut plan = Plan::new();
        while let Some(result) = rx.recv().await {
            let summary = result.summary();
            if plan.record(result) && !events::emit(events, Event::log(summary)).await {
                break;
            }
            if plan.is_full() {
                break;
            }
        }

        for kind in crate::providers::ProviderKind::ALL {
            if !plan.has(kind) {
                let aborted =
                    ProviderResult::failure(kind, format!("{kind} search aborted unexpectedly"));
                let summary = aborted.summary();
                if plan.record(aborted) {
                    events::emit(events, Event::log(summary)).await;
                }
            }
        }

        plan
    }

    /// Attempt one best-effort delivery under the delivery deadline
    ///
    /// Failures are reported as progress logs and never as terminal errors.
    /// Returns false when the event sink closed mid-delivery.
    async fn run_delivery(
        &self,
        adapter: &dyn DeliveryAdapter,
        itinerary: &str,
        target: &str,
        events: &mpsc::Sender<Event>,
    ) -> bool {
        // nobody is listening; skip the side effect entirely
        if events.is_closed() {
            tracing::debug!(
                channel = adapter.name(),
                "Event sink closed; skipping delivery"
            );
            return false;
        }

        let message = match timeout(
            self.config.delivery_timeout,
            adapter.deliver(itinerary, target),
        )
        .await
        {
            Ok(Ok(())) => format!("Sent the itinerary via {} to {}.", adapter.name(), target),
            Ok(Err(failure)) => {
                tracing::warn!(channel = adapter.name(), reason = %failure, "Delivery failed");
                format!("Could not deliver via {}: {}", adapter.name(), failure)
            }
            Err(_) => {
                tracing::warn!(
                    channel = adapter.name(),
                    timeout_secs = self.config.delivery_timeout.as_secs(),
                    "Delivery timed out"
                );
                format!(
                    "Could not deliver via {}: timed out after {}s",
                    adapter.name(),
                    self.config.delivery_timeout.as_secs()
                )
            }
        };
        events::emit(events, Event::log(message)).await
    }
}
