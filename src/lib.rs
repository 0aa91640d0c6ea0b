//! Trip Planner Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod delivery;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod providers;
pub mod state;
pub mod trip;
