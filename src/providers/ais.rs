//! HTTP client for the upstream AIS data service.
//!
//! The upstream API answers position queries either as an array of objects
//! with wildly varying field names, or as compact array rows of the form
//! `[mmsi, timestamp, lon, lat, course, speed, navStatus, sog2, val8,
//! heading]`. Normalization is best-effort: malformed rows are skipped,
//! never fatal.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::error::{ProviderError, ProviderResult};
use super::{PositionProvider, StaticInfoProvider};
use crate::api::{AisClass, Mmsi, PositionQuery, PositionReport, StaticInfo};
use crate::models::time::format_compact_utc;

/// Client for the AIS position and static-info endpoints.
pub struct AisApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl AisApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch position reports for a bounding box and time window.
    ///
    /// The minimum-speed filter is re-applied client-side as a fallback in
    /// case the server ignores it.
    pub async fn get_vessel_positions(
        &self,
        query: &PositionQuery,
    ) -> ProviderResult<Vec<PositionReport>> {
        let url = format!("{}/ais/positions/within-bbox-time", self.base_url);
        let body = json!({
            "bbox": query.bbox.to_query_string(),
            "start": format_compact_utc(query.window.start),
            "end": format_compact_utc(query.window.end),
            "minSpeed": query.min_speed_knots,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::request("get_vessel_positions", e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::request("get_vessel_positions", e.to_string()))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::decode("get_vessel_positions", e.to_string()))?;

        let raw_positions = extract_record_array(&payload);
        log::debug!(
            "AIS returned {} raw position records",
            raw_positions.len()
        );

        let positions: Vec<PositionReport> = raw_positions
            .iter()
            .filter_map(|record| normalize_position(record))
            .filter(|p| p.speed_knots >= query.min_speed_knots)
            .collect();

        Ok(positions)
    }

    /// Fetch the static snapshot for one identity near an instant.
    ///
    /// Degrades to `Ok(None)` on any fetch failure: a missing static record
    /// must never fail the surrounding analysis.
    pub async fn get_vessel_static_info(
        &self,
        mmsi: &Mmsi,
        at: DateTime<Utc>,
    ) -> ProviderResult<Option<StaticInfo>> {
        let url = format!(
            "{}/ais/statinfo/for-mmsis-time?mmsis={}&time={}",
            self.base_url,
            mmsi,
            format_compact_utc(at)
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Static info request for {} failed: {}", mmsi, e);
                return Ok(None);
            }
        };

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            log::warn!(
                "Static info request for {} returned {}",
                mmsi,
                response.status()
            );
            return Ok(None);
        }

        let payload: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Static info payload for {} unreadable: {}", mmsi, e);
                return Ok(None);
            }
        };

        // Response could be an object or an array; take the first record.
        let record = match &payload {
            Value::Array(items) => items.first(),
            Value::Object(_) => Some(&payload),
            _ => None,
        };

        Ok(record.and_then(|r| normalize_static_info(r, mmsi)))
    }
}

#[async_trait]
impl PositionProvider for AisApiClient {
    async fn fetch_positions(&self, query: &PositionQuery) -> ProviderResult<Vec<PositionReport>> {
        self.get_vessel_positions(query).await
    }
}

#[async_trait]
impl StaticInfoProvider for AisApiClient {
    async fn fetch_static_info(
        &self,
        mmsi: &Mmsi,
        at: DateTime<Utc>,
    ) -> ProviderResult<Option<StaticInfo>> {
        self.get_vessel_static_info(mmsi, at).await
    }
}

/// Locate the record array inside a payload that may be a bare array or an
/// object wrapping it under a handful of conventional keys.
fn extract_record_array(payload: &Value) -> Vec<&Value> {
    if let Value::Array(items) = payload {
        return items.iter().collect();
    }
    if let Value::Object(obj) = payload {
        for key in ["positions", "data", "results"] {
            if let Some(Value::Array(items)) = obj.get(key) {
                return items.iter().collect();
            }
        }
        // Last resort: the first array-valued field.
        if let Some(Value::Array(items)) = obj.values().find(|v| v.is_array()) {
            return items.iter().collect();
        }
    }
    Vec::new()
}

fn normalize_position(record: &Value) -> Option<PositionReport> {
    match record {
        Value::Array(row) => normalize_compact_row(row),
        Value::Object(_) => normalize_position_object(record),
        _ => None,
    }
}

/// Compact row format: `[mmsi, timestamp, lon, lat, course, speed,
/// navStatus, sog2, val8, heading]`. Only the first six entries are
/// required.
fn normalize_compact_row(row: &[Value]) -> Option<PositionReport> {
    if row.len() < 6 {
        return None;
    }
    let mmsi = string_value(&row[0])?;
    let timestamp = parse_wire_timestamp(&row[1])?;
    let longitude = row[2].as_f64()?;
    let latitude = row[3].as_f64()?;
    let speed = number_value(&row[5]).unwrap_or(0.0);
    let heading = row
        .get(9)
        .and_then(Value::as_f64)
        .or_else(|| row[4].as_f64());

    Some(PositionReport {
        mmsi: Mmsi::new(mmsi),
        timestamp,
        latitude,
        longitude,
        speed_knots: speed,
        heading_deg: heading,
        name: None,
        declared_type: None,
    })
}

fn normalize_position_object(record: &Value) -> Option<PositionReport> {
    let latitude = number_field(record, &["latitude", "lat", "Latitude", "Lat"])?;
    let longitude = number_field(record, &["longitude", "lon", "lng", "Longitude", "Lon"])?;
    let mmsi = first_field(record, &["mmsi", "MMSI", "imo", "IMO"]).and_then(string_value)?;
    let timestamp = first_field(
        record,
        &["timestamp", "time", "Time", "lastUpdate", "last_report", "ts"],
    )
    .and_then(parse_wire_timestamp)?;
    let speed = number_field(
        record,
        &["speed", "sog", "SOG", "Speed", "speedOverGround"],
    )
    .unwrap_or(0.0);

    Some(PositionReport {
        mmsi: Mmsi::new(mmsi),
        timestamp,
        latitude,
        longitude,
        speed_knots: speed,
        heading_deg: number_field(record, &["heading", "cog", "COG", "headingTrue", "HDG"]),
        name: first_field(record, &["vesselName", "name", "shipname", "ShipName", "NAME"])
            .and_then(string_value),
        declared_type: first_field(record, &["vesselType", "type", "shiptype", "TYPE"])
            .and_then(string_value),
    })
}

fn normalize_static_info(record: &Value, requested: &Mmsi) -> Option<StaticInfo> {
    if !record.is_object() {
        return None;
    }

    // Length/beam may arrive as totals or as bow/stern (port/starboard)
    // distance pairs to be summed.
    let length_m = number_field(record, &["length", "Length"]).or_else(|| {
        match (
            number_field(record, &["dimension_to_bow"]),
            number_field(record, &["dimension_to_stern"]),
        ) {
            (Some(bow), Some(stern)) => Some(bow + stern),
            _ => None,
        }
    });
    let beam_m = number_field(record, &["beam", "Beam"]).or_else(|| {
        match (
            number_field(record, &["dimension_to_port"]),
            number_field(record, &["dimension_to_starboard"]),
        ) {
            (Some(port), Some(starboard)) => Some(port + starboard),
            _ => None,
        }
    });

    let ais_class = first_field(record, &["class", "aisClass", "Class"])
        .and_then(string_value)
        .and_then(|c| match c.to_uppercase().as_str() {
            "A" => Some(AisClass::A),
            "B" => Some(AisClass::B),
            _ => None,
        });

    Some(StaticInfo {
        mmsi: first_field(record, &["mmsi", "MMSI"])
            .and_then(string_value)
            .map(Mmsi::new)
            .unwrap_or_else(|| requested.clone()),
        name: first_field(record, &["name", "shipname", "ShipName", "vesselName"])
            .and_then(string_value),
        callsign: first_field(record, &["callsign", "CallSign", "call_sign"])
            .and_then(string_value),
        imo: first_field(record, &["imo", "IMO"]).and_then(Value::as_i64),
        ship_type: first_field(
            record,
            &["shipTypeText", "shipTypeDesc", "shiptype_text", "shiptype", "type"],
        )
        .and_then(string_value),
        ship_type_code: number_field(record, &["shipType", "shiptype_code"]).map(|v| v as i32),
        length_m,
        beam_m,
        draught_m: number_field(record, &["draught", "Draught", "draft"]),
        flag: first_field(record, &["flag", "Flag", "country", "Country"]).and_then(string_value),
        destination: first_field(record, &["destination", "Destination"]).and_then(string_value),
        eta: first_field(record, &["eta", "ETA"]).and_then(string_value),
        ais_class,
        retrieved_at: first_field(record, &["timestamp"]).and_then(parse_wire_timestamp),
    })
}

fn first_field<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| record.get(k).filter(|v| !v.is_null()))
}

fn number_field(record: &Value, keys: &[&str]) -> Option<f64> {
    first_field(record, keys).and_then(number_value)
}

fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn string_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Timestamps arrive either as RFC 3339 strings or as epoch milliseconds.
pub(crate) fn parse_wire_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}
