//! HTTP client for the external sensor-classification service.
//!
//! Given a bounding box and time window, the service returns detected
//! vessels (including non-AIS, sensor-derived targets) with inferred type.
//! Detection queries degrade to an empty list on any failure: a sensor
//! outage must shrink the analysis, not fail it.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::error::ProviderResult;
use super::DetectionProvider;
use crate::api::{BoundingBox, ExternalDetection, Mmsi, TimeWindow};

/// Client for the external detection classification endpoint.
pub struct ExternalClassificationClient {
    base_url: String,
    client: reqwest::Client,
}

impl ExternalClassificationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch classified detections for a bounding box and time window,
    /// degrading to an empty list on any fetch or decode failure.
    pub async fn classify_detections(
        &self,
        bbox: &BoundingBox,
        window: &TimeWindow,
    ) -> ProviderResult<Vec<ExternalDetection>> {
        let url = format!("{}/classify/detections", self.base_url);
        let body = json!({
            "bbox": {
                "southwest": { "lat": bbox.southwest.latitude, "lng": bbox.southwest.longitude },
                "northeast": { "lat": bbox.northeast.latitude, "lng": bbox.northeast.longitude },
            },
            "start": window.start.to_rfc3339(),
            "end": window.end.to_rfc3339(),
        });

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Detection classification request failed: {}", e);
                return Ok(Vec::new());
            }
        };

        if !response.status().is_success() {
            log::warn!(
                "Detection classification returned {}",
                response.status()
            );
            return Ok(Vec::new());
        }

        let payload: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Detection classification payload unreadable: {}", e);
                return Ok(Vec::new());
            }
        };

        let raw = match &payload {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            Value::Object(obj) => match obj.get("detections") {
                Some(Value::Array(items)) => items.iter().collect(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        Ok(raw.iter().filter_map(|r| normalize_detection(r)).collect())
    }
}

#[async_trait]
impl DetectionProvider for ExternalClassificationClient {
    async fn fetch_detections(
        &self,
        bbox: &BoundingBox,
        window: &TimeWindow,
    ) -> ProviderResult<Vec<ExternalDetection>> {
        self.classify_detections(bbox, window).await
    }
}

fn normalize_detection(record: &Value) -> Option<ExternalDetection> {
    if !record.is_object() {
        return None;
    }

    let latitude = number_field(record, &["lat", "latitude"])?;
    let longitude = number_field(record, &["lon", "lng", "longitude"])?;
    let timestamp = first_field(record, &["timestamp", "ts", "time"])
        .and_then(super::ais::parse_wire_timestamp)?;

    Some(ExternalDetection {
        track_id: first_field(record, &["id", "trackId", "track_id"]).and_then(string_value),
        mmsi: first_field(record, &["mmsi", "MMSI"])
            .and_then(string_value)
            .map(Mmsi::new),
        latitude,
        longitude,
        timestamp,
        confidence: number_field(record, &["confidence"]),
        inferred_type: first_field(record, &["inferredType", "type", "classification"])
            .and_then(string_value),
        source: first_field(record, &["source", "sensor"]).and_then(string_value),
        length_estimate_m: number_field(record, &["length", "length_m"]),
        heading_deg: number_field(record, &["heading"]),
        speed_estimate_knots: number_field(record, &["speed", "sog"]),
    })
}

fn first_field<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| record.get(k).filter(|v| !v.is_null()))
}

fn number_field(record: &Value, keys: &[&str]) -> Option<f64> {
    first_field(record, keys).and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
