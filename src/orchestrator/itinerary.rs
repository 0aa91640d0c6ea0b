//! Itinerary rendering
//!
//! Pure text assembly over the trip request and the sealed plan; no network
//! calls happen here. Sections appear in fixed order (flights, hotels,
//! activities) and missing sections are labeled explicitly rather than
//! silently dropped.

use crate::orchestrator::plan::Plan;
use crate::providers::ProviderKind;
use crate::trip::TripRequest;

/// Render the itinerary text for a finished plan
pub fn render(trip: &TripRequest, plan: &Plan) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Trip Plan: {} to {}\n",
        trip.origin(),
        trip.destination()
    ));
    out.push_str(&format!(
        "Dates: {} to {} ({} nights)\n",
        trip.departure_date(),
        trip.return_date(),
        trip.nights()
    ));
    out.push_str(&format!("Travelers: {}\n", trip.travelers()));
    if !trip.interests().is_empty() {
        out.push_str(&format!("Interests: {}\n", trip.interests().join(", ")));
    }
    if let Some(budget) = trip.budget() {
        out.push_str(&format!(
            "Budget: {:.2} {}\n",
            budget.amount, budget.currency
        ));
    }

    for kind in ProviderKind::ALL {
        out.push('\n');
        out.push_str(section_heading(kind));
        out.push('\n');
        out.push_str(&section_body(kind, plan));
        out.push('\n');
    }

    out.push_str("\nHave a wonderful trip!\n");
    out
}

fn section_heading(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Flights => "== Flights ==",
        ProviderKind::Hotels => "== Accommodation ==",
        ProviderKind::Activities => "== Activities & Recommendations ==",
    }
}

fn section_body(kind: ProviderKind, plan: &Plan) -> String {
    match plan.result_for(kind) {
        Some(result) if result.is_success() => match result.payload() {
            Some(payload) if !payload.is_empty() => payload.to_string(),
            _ => format!("No {} results were found for this trip.", kind.label()),
        },
        Some(result) => format!(
            "{} suggestions are unavailable: {}.",
            kind.title(),
            result.reason().unwrap_or("unknown failure")
        ),
        None => format!("{} suggestions are unavailable.", kind.title()),
    }
}
