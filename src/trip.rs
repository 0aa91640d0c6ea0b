//! Trip request data model
//!
//! Defines the validated, immutable trip request produced by extraction,
//! plus the unvalidated field set that extraction parses from free text.
//! Invalid input never produces a `TripRequest`; it produces an
//! [`ExtractionFailure`] instead.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// Sentinel the extraction model emits for required fields it could not
/// determine from the prompt.
pub const UNKNOWN_FIELD: &str = "UNKNOWN";

/// Failure to turn free text into a valid trip request
///
/// This is the fatal failure class: the orchestrator emits a single terminal
/// error and makes no provider calls when extraction fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionFailure {
    /// A required field could not be determined from the prompt
    #[error("could not determine the {0} from your request; please be more specific")]
    MissingField(&'static str),

    /// A date field did not parse as YYYY-MM-DD
    #[error("invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// Which date field failed to parse
        field: &'static str,
        /// The raw value that failed to parse
        value: String,
    },

    /// Return date precedes the departure date
    #[error("return date {return_date} is before departure date {departure_date}")]
    DateOrder {
        /// Extracted departure date
        departure_date: NaiveDate,
        /// Extracted return date
        return_date: NaiveDate,
    },

    /// Traveler count below one
    #[error("traveler count must be at least 1")]
    NoTravelers,

    /// The model response could not be parsed into trip fields
    #[error("could not understand the details in your request: {0}")]
    Unparseable(String),

    /// The extraction service itself failed (HTTP error, rate limit, timeout)
    #[error("extraction service error: {0}")]
    Service(String),
}

fn default_travelers() -> u32 {
    1
}

/// Unvalidated trip fields, in the JSON shape the extraction model is
/// instructed to produce
#[derive(Debug, Clone, Deserialize)]
pub struct TripFields {
    /// Origin place identifier (IATA city code)
    pub origin: String,
    /// Destination place identifier (IATA city code)
    pub destination: String,
    /// Departure date as YYYY-MM-DD
    pub departure_date: String,
    /// Return date as YYYY-MM-DD
    pub return_date: String,
    /// Number of travelers (defaults to 1 when unstated)
    #[serde(default = "default_travelers")]
    pub travelers: u32,
    /// Free-text interest tags, in prompt order
    #[serde(default)]
    pub interests: Vec<String>,
    /// Optional trip budget
    #[serde(default)]
    pub budget: Option<Budget>,
    /// Optional email address the itinerary should be sent to
    #[serde(default)]
    pub user_email: Option<String>,
    /// Whether the user asked for a calendar entry
    #[serde(default)]
    pub add_to_calendar: bool,
}

/// A currency amount attached to a trip request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Budget {
    /// Total amount in `currency` units
    pub amount: f64,
    /// ISO currency code, e.g. "INR"
    pub currency: String,
}

/// A validated, immutable trip request
///
/// Construction is only possible through [`TripRequest::from_fields`], which
/// validates dates, their ordering, and the traveler count. Fields are
/// private so a request can never be mutated after construction.
#[derive(Debug, Clone)]
pub struct TripRequest {
    origin: String,
    destination: String,
    departure_date: NaiveDate,
    return_date: NaiveDate,
    travelers: u32,
    interests: Vec<String>,
    budget: Option<Budget>,
    email: Option<String>,
    calendar_sync: bool,
}

impl TripRequest {
    /// Validate extracted fields into an immutable trip request
    ///
    /// # Errors
    /// Returns an [`ExtractionFailure`] naming the offending field when a
    /// required field is empty, a date does not parse, the return date
    /// precedes the departure date, or the traveler count is zero.
    pub fn from_fields(fields: TripFields) -> Result<Self, ExtractionFailure> {
        let origin = fields.origin.trim().to_string();
        if origin.is_empty() {
            return Err(ExtractionFailure::MissingField("origin"));
        }
        let destination = fields.destination.trim().to_string();
        if destination.is_empty() {
            return Err(ExtractionFailure::MissingField("destination"));
        }

        let departure_date = parse_date("departure date", &fields.departure_date)?;
        let return_date = parse_date("return date", &fields.return_date)?;
        if return_date < departure_date {
            return Err(ExtractionFailure::DateOrder {
                departure_date,
                return_date,
            });
        }

        if fields.travelers == 0 {
            return Err(ExtractionFailure::NoTravelers);
        }

        let interests = fields
            .interests
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();

        let email = fields
            .user_email
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty());

        Ok(Self {
            origin,
            destination,
            departure_date,
            return_date,
            travelers: fields.travelers,
            interests,
            budget: fields.budget,
            email,
            calendar_sync: fields.add_to_calendar,
        })
    }

    /// Origin place identifier
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Destination place identifier
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Departure date
    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    /// Return date (always >= departure date)
    pub fn return_date(&self) -> NaiveDate {
        self.return_date
    }

    /// Number of travelers (always >= 1)
    pub fn travelers(&self) -> u32 {
        self.travelers
    }

    /// Interest tags, in prompt order
    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    /// Optional trip budget
    pub fn budget(&self) -> Option<&Budget> {
        self.budget.as_ref()
    }

    /// Email address to deliver the itinerary to, if requested
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Whether the user asked for a calendar entry
    pub fn calendar_sync(&self) -> bool {
        self.calendar_sync
    }

    /// Number of nights between departure and return
    pub fn nights(&self) -> i64 {
        (self.return_date - self.departure_date).num_days()
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ExtractionFailure> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ExtractionFailure::InvalidDate {
            field,
            value: value.to_string(),
        }
    })
}
