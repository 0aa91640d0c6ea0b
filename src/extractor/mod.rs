//! Trip request extraction
//!
//! The orchestration core depends only on the narrow [`TripExtractor`] seam:
//! free text in, validated trip request (or failure) out. The production
//! implementation backed by the Gemini API lives in [`gemini`]; tests inject
//! deterministic stubs.

pub mod gemini;

use crate::trip::{ExtractionFailure, TripRequest};
use async_trait::async_trait;

/// Opaque text-to-trip-request extraction collaborator
#[async_trait]
pub trait TripExtractor: Send + Sync {
    /// Extract a validated trip request from free-form prompt text
    async fn extract(&self, prompt: &str) -> Result<TripRequest, ExtractionFailure>;
}
