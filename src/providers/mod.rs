//! External data collaborators behind async traits.
//!
//! The analysis core never performs I/O; everything it consumes arrives
//! through the three provider traits below, allowing different backends to
//! be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (services::analyzer) - Orchestration      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Provider Traits - Abstract Interface                    │
//! │  PositionProvider / StaticInfoProvider / DetectionProvider│
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────────────────────┐
//!     │  LocalProvider (in-memory)                    │
//!     │  RemoteProvider (AIS + classification HTTP)   │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! Degradation contract: remote static-info lookups return `Ok(None)` and
//! remote detection queries return `Ok(vec![])` on any fetch failure, so
//! upstream outages shrink the analysis instead of failing it. Position
//! fetch failures propagate: without positions there is nothing to analyze.

#[cfg(not(any(feature = "local-provider", feature = "remote-providers")))]
compile_error!("Enable at least one provider backend feature.");

pub mod error;
pub mod factory;

#[cfg(feature = "remote-providers")]
pub mod ais;
#[cfg(feature = "remote-providers")]
pub mod classification;
#[cfg(feature = "local-provider")]
pub mod local;

pub use error::{ProviderError, ProviderResult};
pub use factory::{ProviderFactory, ProviderKind};

#[cfg(feature = "remote-providers")]
pub use ais::AisApiClient;
#[cfg(feature = "remote-providers")]
pub use classification::ExternalClassificationClient;
#[cfg(feature = "local-provider")]
pub use local::LocalProvider;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::{
    BoundingBox, ExternalDetection, Mmsi, PositionQuery, PositionReport, StaticInfo, TimeWindow,
};

/// Source of AIS position reports for a bounding box and time window.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn fetch_positions(&self, query: &PositionQuery) -> ProviderResult<Vec<PositionReport>>;
}

/// Source of declared static vessel attributes.
#[async_trait]
pub trait StaticInfoProvider: Send + Sync {
    /// Static snapshot for one identity at (or near) an instant.
    /// `Ok(None)` means the identity is unknown to the source.
    async fn fetch_static_info(
        &self,
        mmsi: &Mmsi,
        at: DateTime<Utc>,
    ) -> ProviderResult<Option<StaticInfo>>;
}

/// Source of independent (non-AIS) sensor detections.
#[async_trait]
pub trait DetectionProvider: Send + Sync {
    async fn fetch_detections(
        &self,
        bbox: &BoundingBox,
        window: &TimeWindow,
    ) -> ProviderResult<Vec<ExternalDetection>>;
}

/// The full collaborator surface the analyzer needs.
pub trait VesselDataProvider:
    PositionProvider + StaticInfoProvider + DetectionProvider
{
}

impl<T: PositionProvider + StaticInfoProvider + DetectionProvider> VesselDataProvider for T {}
