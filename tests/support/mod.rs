//! Shared fixture builders for integration tests.

use chrono::{DateTime, TimeZone, Utc};

use mda_rust::api::{
    BoundingBox, ExternalDetection, GeoPoint, Mmsi, PositionQuery, PositionReport, StaticInfo,
    TimeWindow,
};

/// The default test window: 2024-03-01, full day, UTC.
pub fn window_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

/// Arctic-ish test area: 69-71N, 18-22E.
pub fn default_query() -> PositionQuery {
    PositionQuery {
        bbox: BoundingBox::new(GeoPoint::new(69.0, 18.0), GeoPoint::new(71.0, 22.0)).unwrap(),
        window: TimeWindow::new(
            window_start(),
            Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
        )
        .unwrap(),
        min_speed_knots: 0.0,
    }
}

/// A position report at noon + `minute` on the test day.
pub fn position(mmsi: &str, minute: u32, lat: f64, lon: f64, speed: f64) -> PositionReport {
    PositionReport {
        mmsi: Mmsi::new(mmsi),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap(),
        latitude: lat,
        longitude: lon,
        speed_knots: speed,
        heading_deg: None,
        name: None,
        declared_type: None,
    }
}

/// A sensor detection at noon + `minute` on the test day.
pub fn detection(
    mmsi: Option<&str>,
    minute: u32,
    lat: f64,
    lon: f64,
    inferred_type: Option<&str>,
) -> ExternalDetection {
    ExternalDetection {
        track_id: Some(format!("trk-{}", minute)),
        mmsi: mmsi.map(Mmsi::new),
        latitude: lat,
        longitude: lon,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap(),
        confidence: Some(0.9),
        inferred_type: inferred_type.map(str::to_string),
        source: Some("SAR".to_string()),
        length_estimate_m: None,
        heading_deg: None,
        speed_estimate_knots: None,
    }
}

/// Static info declaring a ship type and length.
pub fn static_info(mmsi: &str, ship_type: &str, length_m: f64) -> StaticInfo {
    StaticInfo {
        ship_type: Some(ship_type.to_string()),
        length_m: Some(length_m),
        ..StaticInfo::empty(Mmsi::new(mmsi))
    }
}

/// A straight northbound transit track: `count` points, one every 10
/// minutes, ~6.5 nm between consecutive points.
pub fn transit_track(mmsi: &str, count: u32, speed: f64) -> Vec<PositionReport> {
    (0..count)
        .map(|i| position(mmsi, i * 10, 69.5 + 0.11 * i as f64, 20.0, speed))
        .collect()
}

/// A drifting low-speed track near one spot.
pub fn stationary_track(mmsi: &str, count: u32) -> Vec<PositionReport> {
    (0..count)
        .map(|i| position(mmsi, i * 10, 70.2 + 0.0001 * i as f64, 21.0, 0.1))
        .collect()
}
