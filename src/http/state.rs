//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::providers::VesselDataProvider;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Data backend for positions, static info and detections
    pub provider: Arc<dyn VesselDataProvider>,
    /// Analysis thresholds and overrides
    pub config: Arc<AnalysisConfig>,
}

impl AppState {
    pub fn new(provider: Arc<dyn VesselDataProvider>, config: AnalysisConfig) -> Self {
        Self {
            provider,
            config: Arc::new(config),
        }
    }
}
