//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! The analysis DTOs are re-exported from the api module since they
//! already derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    // Analysis
    AnalyzedVessel, Classification, TrajectoryMetrics, WindowAnalysis,
    // Consistency
    ConsistencyIssue, ConsistencyReport, IssueCode, ReportSummary,
    // Dark vessels
    AnomalyType, DarkVesselAnomaly,
    // Records
    ExternalDetection, PositionReport, StaticInfo,
};

use crate::api::{BoundingBox, PositionQuery, TimeWindow};
use crate::models::time::parse_compact_utc;

/// Query parameters shared by the window-scoped endpoints.
///
/// Times use the upstream AIS API's compact `YYYYMMDDHHMM` UTC format and
/// the bbox uses `lon1,lat1,lon2,lat2`, so a frontend can forward the same
/// values it would send upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowQuery {
    pub bbox: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub min_speed: f64,
}

impl WindowQuery {
    pub fn to_position_query(&self) -> Result<PositionQuery, String> {
        let bbox = BoundingBox::from_query_string(&self.bbox)?;
        let start = parse_compact_utc(&self.start)?;
        let end = parse_compact_utc(&self.end)?;
        let window = TimeWindow::new(start, end)
            .ok_or_else(|| format!("Invalid window: {} is not before {}", self.start, self.end))?;
        Ok(PositionQuery {
            bbox,
            window,
            min_speed_knots: self.min_speed,
        })
    }
}

/// Query parameters for the static-info endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticInfoQuery {
    /// Snapshot instant in compact `YYYYMMDDHHMM` UTC form
    pub at: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
}

/// Response for the raw positions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsResponse {
    pub positions: Vec<PositionReport>,
    pub count: usize,
}

/// Response for the dark-vessels endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DarkVesselsResponse {
    pub anomalies: Vec<DarkVesselAnomaly>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_query_parsing() {
        let query = WindowQuery {
            bbox: "18,69,22,71".to_string(),
            start: "202403010000".to_string(),
            end: "202403020000".to_string(),
            min_speed: 1.5,
        };
        let parsed = query.to_position_query().unwrap();
        assert_eq!(parsed.min_speed_knots, 1.5);
        assert!((parsed.window.duration_hours().value() - 24.0).abs() < 1e-9);
        assert!(parsed.bbox.contains(70.0, 20.0));
    }

    #[test]
    fn test_window_query_rejects_reversed_window() {
        let query = WindowQuery {
            bbox: "18,69,22,71".to_string(),
            start: "202403020000".to_string(),
            end: "202403010000".to_string(),
            min_speed: 0.0,
        };
        assert!(query.to_position_query().is_err());
    }

    #[test]
    fn test_window_query_rejects_bad_bbox() {
        let query = WindowQuery {
            bbox: "18,69".to_string(),
            start: "202403010000".to_string(),
            end: "202403020000".to_string(),
            min_speed: 0.0,
        };
        assert!(query.to_position_query().is_err());
    }
}
