//! Provider factory for dependency injection.
//!
//! Creates and configures provider instances based on runtime
//! configuration, so the server binary and tests can select backends
//! without touching construction details.

use std::str::FromStr;
use std::sync::Arc;

use super::error::{ProviderError, ProviderResult};
use super::VesselDataProvider;
use crate::config::ProviderSettings;

/// Provider backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// In-memory provider
    Local,
    /// Remote AIS + classification HTTP clients
    Remote,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" | "ais" => Ok(Self::Remote),
            _ => Err(format!("Unknown provider kind: {}", s)),
        }
    }
}

impl ProviderKind {
    /// Read the provider kind from the environment.
    ///
    /// `MDA_PROVIDER` wins when set; otherwise a configured AIS base URL
    /// selects the remote backend, and the in-memory backend is the
    /// fallback.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("MDA_PROVIDER") {
            return val.parse().unwrap_or(Self::Local);
        }
        if std::env::var("MDA_AIS_BASE_URL").is_ok() {
            Self::Remote
        } else {
            Self::Local
        }
    }
}

/// Factory for creating provider instances.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider of the requested kind.
    pub fn create(
        kind: ProviderKind,
        settings: &ProviderSettings,
    ) -> ProviderResult<Arc<dyn VesselDataProvider>> {
        match kind {
            ProviderKind::Local => Self::create_local_backend(),
            ProviderKind::Remote => Self::create_remote_backend(settings),
        }
    }

    #[cfg(feature = "local-provider")]
    fn create_local_backend() -> ProviderResult<Arc<dyn VesselDataProvider>> {
        Ok(Arc::new(super::local::LocalProvider::new()))
    }

    #[cfg(not(feature = "local-provider"))]
    fn create_local_backend() -> ProviderResult<Arc<dyn VesselDataProvider>> {
        Err(ProviderError::configuration(
            "local provider requested but the local-provider feature is not enabled",
        ))
    }

    #[cfg(feature = "remote-providers")]
    fn create_remote_backend(
        settings: &ProviderSettings,
    ) -> ProviderResult<Arc<dyn VesselDataProvider>> {
        if settings.ais_base_url.is_empty() {
            return Err(ProviderError::configuration(
                "remote provider requires a non-empty ais_base_url",
            ));
        }
        Ok(Arc::new(RemoteProvider::new(
            super::ais::AisApiClient::new(settings.ais_base_url.as_str()),
            super::classification::ExternalClassificationClient::new(
                settings.classification_base_url.as_str(),
            ),
        )))
    }

    #[cfg(not(feature = "remote-providers"))]
    fn create_remote_backend(
        _settings: &ProviderSettings,
    ) -> ProviderResult<Arc<dyn VesselDataProvider>> {
        Err(ProviderError::configuration(
            "remote provider requested but the remote-providers feature is not enabled",
        ))
    }

    /// Create an empty in-memory provider.
    #[cfg(feature = "local-provider")]
    pub fn create_local() -> Arc<dyn VesselDataProvider> {
        Arc::new(super::local::LocalProvider::new())
    }
}

/// Composite remote backend: AIS positions and static info from the AIS
/// API, detections from the external classification service.
#[cfg(feature = "remote-providers")]
pub struct RemoteProvider {
    ais: super::ais::AisApiClient,
    classification: super::classification::ExternalClassificationClient,
}

#[cfg(feature = "remote-providers")]
impl RemoteProvider {
    pub fn new(
        ais: super::ais::AisApiClient,
        classification: super::classification::ExternalClassificationClient,
    ) -> Self {
        Self {
            ais,
            classification,
        }
    }
}

#[cfg(feature = "remote-providers")]
#[async_trait::async_trait]
impl super::PositionProvider for RemoteProvider {
    async fn fetch_positions(
        &self,
        query: &crate::api::PositionQuery,
    ) -> ProviderResult<Vec<crate::api::PositionReport>> {
        self.ais.get_vessel_positions(query).await
    }
}

#[cfg(feature = "remote-providers")]
#[async_trait::async_trait]
impl super::StaticInfoProvider for RemoteProvider {
    async fn fetch_static_info(
        &self,
        mmsi: &crate::api::Mmsi,
        at: chrono::DateTime<chrono::Utc>,
    ) -> ProviderResult<Option<crate::api::StaticInfo>> {
        self.ais.get_vessel_static_info(mmsi, at).await
    }
}

#[cfg(feature = "remote-providers")]
#[async_trait::async_trait]
impl super::DetectionProvider for RemoteProvider {
    async fn fetch_detections(
        &self,
        bbox: &crate::api::BoundingBox,
        window: &crate::api::TimeWindow,
    ) -> ProviderResult<Vec<crate::api::ExternalDetection>> {
        self.classification.classify_detections(bbox, window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("local".parse::<ProviderKind>().unwrap(), ProviderKind::Local);
        assert_eq!("Remote".parse::<ProviderKind>().unwrap(), ProviderKind::Remote);
        assert_eq!("ais".parse::<ProviderKind>().unwrap(), ProviderKind::Remote);
        assert!("postgres".parse::<ProviderKind>().is_err());
    }

    #[cfg(feature = "local-provider")]
    #[test]
    fn test_create_local() {
        let settings = ProviderSettings::default();
        assert!(ProviderFactory::create(ProviderKind::Local, &settings).is_ok());
    }
}
