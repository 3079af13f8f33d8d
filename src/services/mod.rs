//! Service layer for business logic and orchestration.
//!
//! Services sit between the provider layer and the consumers of the
//! library (the HTTP API, tests, embedding applications). They orchestrate
//! provider calls and feed the pure analytics core.

pub mod analyzer;

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod analyzer_tests;

pub use analyzer::{analyze_vessel, analyze_window, group_positions_by_mmsi, WindowAnalysis};
