//! Public API surface for the Rust backend.
//!
//! This file consolidates the DTO types shared across the analysis core,
//! the provider layer and the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::analysis::classifier::{Classification, ClassifierConfig};
pub use crate::analysis::consistency::{
    ConsistencyIssue, ConsistencyReport, IssueCode, ReportSummary,
};
pub use crate::analysis::dark_vessel::{AnomalyType, CorrelationConfig, DarkVesselAnomaly};
pub use crate::analysis::metrics::TrajectoryMetrics;
pub use crate::services::analyzer::WindowAnalysis;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maritime Mobile Service Identity, the vessel identity token used
/// throughout the analysis core.
///
/// Kept as an opaque string: upstream sources mix genuine nine-digit MMSIs
/// with synthetic sensor-assigned identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Mmsi(pub String);

impl Mmsi {
    pub fn new(value: impl Into<String>) -> Self {
        Mmsi(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Mmsi {
    fn from(value: &str) -> Self {
        Mmsi(value.to_string())
    }
}

impl From<String> for Mmsi {
    fn from(value: String) -> Self {
        Mmsi(value)
    }
}

/// A geographic coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub southwest: GeoPoint,
    pub northeast: GeoPoint,
}

impl BoundingBox {
    pub fn new(southwest: GeoPoint, northeast: GeoPoint) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&southwest.latitude)
            || !(-90.0..=90.0).contains(&northeast.latitude)
        {
            return Err("Latitude must be between -90 and 90 degrees".to_string());
        }
        if !(-180.0..=180.0).contains(&southwest.longitude)
            || !(-180.0..=180.0).contains(&northeast.longitude)
        {
            return Err("Longitude must be between -180 and 180 degrees".to_string());
        }
        if southwest.latitude > northeast.latitude {
            return Err("Southwest corner must be south of northeast corner".to_string());
        }
        Ok(Self {
            southwest,
            northeast,
        })
    }

    /// Whether the point lies inside the box (inclusive bounds).
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.southwest.latitude
            && latitude <= self.northeast.latitude
            && longitude >= self.southwest.longitude
            && longitude <= self.northeast.longitude
    }

    /// Format as the upstream AIS query parameter: `lon1,lat1,lon2,lat2`.
    pub fn to_query_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.southwest.longitude,
            self.southwest.latitude,
            self.northeast.longitude,
            self.northeast.latitude
        )
    }

    /// Parse the `lon1,lat1,lon2,lat2` query form.
    pub fn from_query_string(raw: &str) -> Result<Self, String> {
        let parts: Vec<f64> = raw
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| format!("Invalid bbox '{}': {}", raw, e))?;
        if parts.len() != 4 {
            return Err(format!(
                "Invalid bbox '{}': expected lon1,lat1,lon2,lat2",
                raw
            ));
        }
        Self::new(
            GeoPoint::new(parts[1], parts[0]),
            GeoPoint::new(parts[3], parts[2]),
        )
    }
}

/// Half-open UTC time window for a single analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    pub fn duration_hours(&self) -> qtty::Hours {
        let seconds = (self.end - self.start).num_milliseconds() as f64 / 1000.0;
        qtty::Hours::new(seconds / 3600.0)
    }
}

/// Input to the position-fetch collaborator: bounding box, time window and
/// a minimum-speed filter applied at the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionQuery {
    pub bbox: BoundingBox,
    pub window: TimeWindow,
    pub min_speed_knots: f64,
}

/// A single AIS position report. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub mmsi: Mmsi,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Speed over ground in knots, >= 0
    pub speed_knots: f64,
    /// Heading in degrees 0-360, when the transponder reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw declared ship type text carried on the position message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
}

impl PositionReport {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// AIS transponder class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AisClass {
    A,
    B,
}

/// Declared static attributes for a vessel, from the AIS static message
/// snapshot. Every field except the identity is optional: partial records
/// are the norm and must not fail processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticInfo {
    pub mmsi: Mmsi,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callsign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imo: Option<i64>,
    /// Raw ship type description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<String>,
    /// Numeric type code if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type_code: Option<i32>,
    /// Overall length in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beam_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draught_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// ETA in the upstream API's own format, retained as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ais_class: Option<AisClass>,
    /// Timestamp of the static snapshot retrieval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieved_at: Option<DateTime<Utc>>,
}

impl StaticInfo {
    /// A record carrying nothing but the identity.
    pub fn empty(mmsi: Mmsi) -> Self {
        Self {
            mmsi,
            name: None,
            callsign: None,
            imo: None,
            ship_type: None,
            ship_type_code: None,
            length_m: None,
            beam_m: None,
            draught_m: None,
            flag: None,
            destination: None,
            eta: None,
            ais_class: None,
            retrieved_at: None,
        }
    }
}

/// A sensor-derived vessel detection from an independent (non-AIS) source.
///
/// `mmsi` may be absent: such detections are the "dark vessel" candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDetection {
    /// Sensor track id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mmsi: Option<Mmsi>,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    /// Detection confidence 0..1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// e.g. fishing, cargo, icebreaker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inferred_type: Option<String>,
    /// e.g. SAR, RF, Optical
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_estimate_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_estimate_knots: Option<f64>,
}

impl ExternalDetection {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// One fully analyzed vessel: its track, optional declared identity, and
/// the derived metrics and movement verdict. Owns its position list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedVessel {
    pub mmsi: Mmsi,
    /// Position reports sorted ascending by timestamp
    pub positions: Vec<PositionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_info: Option<StaticInfo>,
    pub metrics: TrajectoryMetrics,
    pub classification: Classification,
    /// Human-readable rationale for the classification
    pub rationale: String,
}

/// Severity grading shared by consistency issues and dark-vessel anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mmsi_display_and_value() {
        let mmsi = Mmsi::new("257012345");
        assert_eq!(mmsi.to_string(), "257012345");
        assert_eq!(mmsi.value(), "257012345");
    }

    #[test]
    fn test_bounding_box_query_roundtrip() {
        let bbox = BoundingBox::new(GeoPoint::new(69.0, 18.0), GeoPoint::new(71.0, 22.0)).unwrap();
        let query = bbox.to_query_string();
        assert_eq!(query, "18,69,22,71");

        let parsed = BoundingBox::from_query_string(&query).unwrap();
        assert_eq!(parsed, bbox);
    }

    #[test]
    fn test_bounding_box_rejects_invalid() {
        assert!(BoundingBox::new(GeoPoint::new(95.0, 0.0), GeoPoint::new(96.0, 1.0)).is_err());
        assert!(BoundingBox::new(GeoPoint::new(10.0, 0.0), GeoPoint::new(5.0, 1.0)).is_err());
        assert!(BoundingBox::from_query_string("18,69,22").is_err());
        assert!(BoundingBox::from_query_string("a,b,c,d").is_err());
    }

    #[test]
    fn test_bounding_box_contains() {
        let bbox = BoundingBox::new(GeoPoint::new(69.0, 18.0), GeoPoint::new(71.0, 22.0)).unwrap();
        assert!(bbox.contains(70.0, 20.0));
        assert!(bbox.contains(69.0, 18.0));
        assert!(!bbox.contains(68.9, 20.0));
        assert!(!bbox.contains(70.0, 22.1));
    }

    #[test]
    fn test_time_window_ordering() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();

        let window = TimeWindow::new(start, end).unwrap();
        assert!((window.duration_hours().value() - 6.0).abs() < 1e-9);
        assert!(window.contains(start));
        assert!(!window.contains(end));

        assert!(TimeWindow::new(end, start).is_none());
        assert!(TimeWindow::new(start, start).is_none());
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::from_str::<Severity>("\"medium\"").unwrap(),
            Severity::Medium
        );
        assert!(Severity::High > Severity::Low);
    }

    #[test]
    fn test_static_info_empty_serializes_sparse() {
        let info = StaticInfo::empty(Mmsi::new("123"));
        let json = serde_json::to_value(&info).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1, "only the identity should be present");
        assert_eq!(obj["mmsi"], "123");
    }
}
