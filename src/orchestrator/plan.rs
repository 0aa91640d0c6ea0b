//! Per-request plan aggregation
//!
//! Collects the single terminal outcome of each provider call and derives
//! plan completeness. A slot accepts only the first outcome recorded for its
//! provider; later duplicates (e.g. a late success after a recorded timeout)
//! are discarded. Sealing makes the plan immutable once all awaited provider
//! calls have reported.

use crate::providers::{ProviderKind, ProviderResult};
use std::collections::HashMap;

/// Derived completeness of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// Every provider succeeded
    Complete,
    /// At least one provider failed but the plan is still usable
    PartialFailure,
    /// Both mandatory providers (flights and hotels) failed
    Failed,
}

/// The orchestrator's working aggregate for one request
#[derive(Debug, Default)]
pub struct Plan {
    slots: HashMap<ProviderKind, ProviderResult>,
    sealed: bool,
}

impl Plan {
    /// An empty, unsealed plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a provider outcome
    ///
    /// Returns false when the plan is sealed or the slot already holds an
    /// outcome; the duplicate is discarded in that case.
    pub fn record(&mut self, result: ProviderResult) -> bool {
        if self.sealed || self.slots.contains_key(&result.kind()) {
            return false;
        }
        self.slots.insert(result.kind(), result);
        true
    }

    /// Whether a slot holds an outcome for the given provider
    pub fn has(&self, kind: ProviderKind) -> bool {
        self.slots.contains_key(&kind)
    }

    /// Whether every provider slot holds an outcome
    pub fn is_full(&self) -> bool {
        ProviderKind::ALL.iter().all(|kind| self.slots.contains_key(kind))
    }

    /// The recorded outcome for a provider, if any
    pub fn result_for(&self, kind: ProviderKind) -> Option<&ProviderResult> {
        self.slots.get(&kind)
    }

    /// Make the plan immutable; further records are rejected
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    fn succeeded(&self, kind: ProviderKind) -> bool {
        self.result_for(kind).map(ProviderResult::is_success).unwrap_or(false)
    }

    /// Derive completeness from the recorded outcomes
    ///
    /// Failed only when both mandatory providers failed; a failed
    /// supplementary provider degrades to PartialFailure.
    pub fn completeness(&self) -> Completeness {
        let flights = self.succeeded(ProviderKind::Flights);
        let hotels = self.succeeded(ProviderKind::Hotels);
        if !flights && !hotels {
            return Completeness::Failed;
        }
        if flights && hotels && self.succeeded(ProviderKind::Activities) {
            Completeness::Complete
        } else {
            Completeness::PartialFailure
        }
    }
}
