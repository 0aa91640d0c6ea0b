//! Typed event stream protocol
//!
//! Every meaningful state transition in a trip-planning request is
//! communicated as exactly one event. The wire encoding is one JSON object
//! per event: `{"type": "log"|"result"|"error", "content": string}`. A
//! request's stream always ends with exactly one terminal event, a Result
//! or an Error, never both and never neither.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// One entry in a request's ordered event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum Event {
    /// Progress note
    Log(String),
    /// Terminal success: the rendered itinerary
    Result(String),
    /// Terminal failure: a human-readable reason
    Error(String),
}

impl Event {
    /// Progress note
    pub fn log(content: impl Into<String>) -> Self {
        Self::Log(content.into())
    }

    /// Terminal success event
    pub fn result(content: impl Into<String>) -> Self {
        Self::Result(content.into())
    }

    /// Terminal failure event
    pub fn error(content: impl Into<String>) -> Self {
        Self::Error(content.into())
    }

    /// Result and Error events end a request's stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result(_) | Self::Error(_))
    }

    /// The event's textual content
    pub fn content(&self) -> &str {
        match self {
            Self::Log(content) | Self::Result(content) | Self::Error(content) => content,
        }
    }
}

/// Push an event into the sink
///
/// Returns false when the receiving side is gone (the caller disconnected);
/// the orchestrator uses that to stop producing further events.
pub async fn emit(sink: &mpsc::Sender<Event>, event: Event) -> bool {
    if sink.send(event).await.is_err() {
        tracing::debug!("Event sink closed; caller disconnected");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_encoding() {
        let json = serde_json::to_string(&Event::log("parsing request")).unwrap();
        assert_eq!(json, r#"{"type":"log","content":"parsing request"}"#);

        let json = serde_json::to_string(&Event::result("itinerary")).unwrap();
        assert_eq!(json, r#"{"type":"result","content":"itinerary"}"#);

        let json = serde_json::to_string(&Event::error("boom")).unwrap();
        assert_eq!(json, r#"{"type":"error","content":"boom"}"#);
    }

    #[test]
    fn test_terminal_classification() {
        assert!(!Event::log("x").is_terminal());
        assert!(Event::result("x").is_terminal());
        assert!(Event::error("x").is_terminal());
    }

    #[tokio::test]
    async fn test_emit_reports_closed_sink() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        assert!(!emit(&tx, Event::log("x")).await);
    }
}
