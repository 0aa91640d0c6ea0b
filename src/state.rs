//! Shared application state
//!
//! Handlers receive the orchestrator through this state; it is assembled
//! once at startup and shared immutably across requests.

use crate::orchestrator::Orchestrator;
use std::sync::Arc;

/// State shared across request handlers
pub struct AppState {
    /// The trip-planning orchestration core
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Wrap an orchestrator for sharing across handlers
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}
