//! API module
//!
//! Contains the HTTP request handler for trip planning and the SSE
//! streaming utilities it relies on.

pub mod streaming;
pub mod trips;
