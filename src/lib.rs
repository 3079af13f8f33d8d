//! # MDA Rust Backend
//!
//! Maritime domain awareness analysis engine.
//!
//! This crate provides a Rust backend for batch analysis of AIS vessel
//! position reports and independent sensor detections over a bounded
//! geographic/time window. It computes per-vessel trajectory metrics,
//! classifies movement behavior, correlates sensor detections against AIS
//! tracks to flag "dark vessels", and scores declared-vs-observed vessel
//! consistency. The backend exposes a REST API via Axum for the frontend.
//!
//! ## Features
//!
//! - **Trajectory Metrics**: distance, speed and heading statistics per track
//! - **Classification**: rule-based movement categories with rationale
//! - **Dark Vessel Detection**: spatio-temporal cross-source correlation
//! - **Consistency Scoring**: declared type/size/speed plausibility checks
//! - **Data Providers**: pluggable AIS and sensor-detection backends
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Shared identity, geometry and record types (DTOs)
//! - [`models`]: Geodesy and time primitives
//! - [`analysis`]: The pure analytics core (metrics, classifier, correlator, scorer)
//! - [`providers`]: External data collaborators behind async traits
//! - [`services`]: High-level orchestration over providers and analytics
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Concurrency
//!
//! The analytics core is purely functional: every operation reads its own
//! input collections and allocates fresh outputs, so independent window
//! analyses can run in parallel with no coordination. Only the provider
//! layer is async.

pub mod api;

pub mod analysis;
pub mod config;
pub mod models;

pub mod providers;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
