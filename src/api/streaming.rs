//! Streaming utilities for Server-Sent Events (SSE)
//!
//! Turns an orchestrator event channel into an SSE HTTP response. Each event
//! is one `data:` frame carrying its JSON encoding; the stream closes with a
//! `[DONE]` frame after the terminal event.

use crate::error::AppError;
use crate::orchestrator::Event;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use futures_util::{stream::Stream, StreamExt};
use tokio::sync::mpsc;

/// Signal sent as the final SSE frame once the event stream has ended
pub const SSE_DONE_SIGNAL: &str = "[DONE]";

/// Create an SSE response from an orchestrator event channel
///
/// # Arguments
/// * `rx` - Receiving side of the run's event channel
///
/// # Returns
/// * `Result<Response, AppError>` - SSE HTTP response or error
pub fn create_sse_response(rx: mpsc::Receiver<Event>) -> Result<Response, AppError> {
    let sse_stream = event_stream(rx).map(|frame| Ok::<_, std::io::Error>(frame));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(sse_stream))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build SSE response: {}", e)))
}

/// Encode channel events as SSE frames, ending after the terminal event
fn event_stream(mut rx: mpsc::Receiver<Event>) -> impl Stream<Item = String> {
    use async_stream::stream;

    stream! {
        while let Some(event) = rx.recv().await {
            let terminal = event.is_terminal();
            match serde_json::to_string(&event) {
                Ok(json) => yield format!("data: {}\n\n", json),
                Err(e) => {
                    tracing::error!(reason = %e, "Failed to encode stream event");
                    yield "data: {\"type\":\"error\",\"content\":\"internal encoding failure\"}\n\n"
                        .to_string();
                }
            }
            if terminal {
                break;
            }
        }

        yield format!("data: {}\n\n", SSE_DONE_SIGNAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_ends_after_terminal_event() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(Event::log("working")).await.unwrap();
        tx.send(Event::result("itinerary")).await.unwrap();
        // anything after the terminal event must not be encoded
        tx.send(Event::log("late")).await.unwrap();
        drop(tx);

        let frames: Vec<String> = event_stream(rx).collect().await;
        assert_eq!(frames.len(), 3);
        assert_eq!(
            frames[0],
            "data: {\"type\":\"log\",\"content\":\"working\"}\n\n"
        );
        assert_eq!(
            frames[1],
            "data: {\"type\":\"result\",\"content\":\"itinerary\"}\n\n"
        );
        assert_eq!(frames[2], "data: [DONE]\n\n");
    }

    #[tokio::test]
    async fn test_closed_channel_still_ends_with_done() {
        let (tx, rx) = mpsc::channel::<Event>(1);
        drop(tx);
        let frames: Vec<String> = event_stream(rx).collect().await;
        assert_eq!(frames, vec!["data: [DONE]\n\n".to_string()]);
    }
}
