//! In-memory provider for unit testing and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::ProviderResult;
use super::{DetectionProvider, PositionProvider, StaticInfoProvider};
use crate::api::{
    BoundingBox, ExternalDetection, Mmsi, PositionQuery, PositionReport, StaticInfo, TimeWindow,
};

/// In-memory implementation of the provider traits.
///
/// Holds fixed collections and answers queries by filtering them, applying
/// the same bbox/window/min-speed semantics a remote source would.
#[derive(Debug, Default)]
pub struct LocalProvider {
    positions: Vec<PositionReport>,
    static_info: HashMap<Mmsi, StaticInfo>,
    detections: Vec<ExternalDetection>,
}

impl LocalProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_positions(mut self, positions: Vec<PositionReport>) -> Self {
        self.positions = positions;
        self
    }

    pub fn with_static_info(mut self, records: Vec<StaticInfo>) -> Self {
        self.static_info = records
            .into_iter()
            .map(|info| (info.mmsi.clone(), info))
            .collect();
        self
    }

    pub fn with_detections(mut self, detections: Vec<ExternalDetection>) -> Self {
        self.detections = detections;
        self
    }
}

#[async_trait]
impl PositionProvider for LocalProvider {
    async fn fetch_positions(&self, query: &PositionQuery) -> ProviderResult<Vec<PositionReport>> {
        Ok(self
            .positions
            .iter()
            .filter(|p| {
                query.window.contains(p.timestamp)
                    && query.bbox.contains(p.latitude, p.longitude)
                    && p.speed_knots >= query.min_speed_knots
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StaticInfoProvider for LocalProvider {
    async fn fetch_static_info(
        &self,
        mmsi: &Mmsi,
        _at: DateTime<Utc>,
    ) -> ProviderResult<Option<StaticInfo>> {
        Ok(self.static_info.get(mmsi).cloned())
    }
}

#[async_trait]
impl DetectionProvider for LocalProvider {
    async fn fetch_detections(
        &self,
        bbox: &BoundingBox,
        window: &TimeWindow,
    ) -> ProviderResult<Vec<ExternalDetection>> {
        Ok(self
            .detections
            .iter()
            .filter(|d| window.contains(d.timestamp) && bbox.contains(d.latitude, d.longitude))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GeoPoint;
    use chrono::TimeZone;

    fn query() -> PositionQuery {
        PositionQuery {
            bbox: BoundingBox::new(GeoPoint::new(69.0, 18.0), GeoPoint::new(71.0, 22.0)).unwrap(),
            window: TimeWindow::new(
                Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
            )
            .unwrap(),
            min_speed_knots: 1.0,
        }
    }

    fn position(minute: u32, lat: f64, lon: f64, speed: f64) -> PositionReport {
        PositionReport {
            mmsi: Mmsi::new("111"),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap(),
            latitude: lat,
            longitude: lon,
            speed_knots: speed,
            heading_deg: None,
            name: None,
            declared_type: None,
        }
    }

    #[tokio::test]
    async fn test_position_filters() {
        let provider = LocalProvider::new().with_positions(vec![
            position(0, 70.0, 20.0, 5.0),  // kept
            position(5, 75.0, 20.0, 5.0),  // outside bbox
            position(10, 70.0, 20.0, 0.5), // below min speed
            PositionReport {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap(),
                ..position(0, 70.0, 20.0, 5.0)
            }, // outside window
        ]);

        let fetched = provider.fetch_positions(&query()).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].speed_knots, 5.0);
    }

    #[tokio::test]
    async fn test_static_info_lookup() {
        let provider = LocalProvider::new().with_static_info(vec![StaticInfo {
            ship_type: Some("tanker".to_string()),
            ..StaticInfo::empty(Mmsi::new("111"))
        }]);

        let found = provider
            .fetch_static_info(&Mmsi::new("111"), Utc::now())
            .await
            .unwrap();
        assert_eq!(found.unwrap().ship_type.as_deref(), Some("tanker"));

        let missing = provider
            .fetch_static_info(&Mmsi::new("999"), Utc::now())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
