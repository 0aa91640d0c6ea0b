//! Trip-planning endpoint
//!
//! A single POST handler: validate the prompt, hand the run to the
//! orchestrator on a fresh event channel and answer with the SSE stream of
//! that channel. Everything that can go wrong after this point is reported
//! on the stream itself.

use crate::api::streaming::create_sse_response;
use crate::error::AppError;
use crate::orchestrator::Event;
use crate::state::AppState;
use axum::{extract::State, response::Response, Json};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Bounded capacity of a run's event channel
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Request body for the plan-trip endpoint
#[derive(Debug, Deserialize)]
pub struct PlanTripRequest {
    /// Free-form trip description
    pub prompt: String,
}

/// Handle POST /api/v1/plan-trip
///
/// # Errors
/// Returns `AppError::InvalidRequest` when the prompt is empty or longer
/// than the configured maximum.
pub async fn plan_trip(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanTripRequest>,
) -> Result<Response, AppError> {
    let prompt = request.prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(AppError::InvalidRequest("prompt is empty".to_string()));
    }
    let max_len = state.orchestrator.max_prompt_length();
    if prompt.len() > max_len {
        return Err(AppError::InvalidRequest(format!(
            "prompt exceeds {} characters",
            max_len
        )));
    }

    tracing::info!(prompt_chars = prompt.len(), "Starting trip-planning run");

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAPACITY);
    let orchestrator = state.orchestrator.clone();
    tokio::spawn(async move {
        orchestrator.run(&prompt, tx).await;
    });

    create_sse_response(rx)
}
