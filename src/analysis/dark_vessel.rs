//! Cross-source correlation of sensor detections against AIS tracks.
//!
//! Three additive checks over one window: sensor detections with no
//! corresponding AIS track, AIS identities transmitting only a single
//! position, and analyst-flagged identities. Anomalies are never removed
//! or deduplicated across different types for the same identity.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{ExternalDetection, Mmsi, PositionReport, Severity};
use crate::models::geo::distance_nm;

/// Dark-vessel anomaly categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyType {
    /// Sensor detection without a corresponding AIS track
    NoAisMatch,
    /// Declared identity does not match the correlated AIS track.
    /// No detector currently emits this variant; it is reserved for a
    /// correlation rule that has not been specified yet.
    MmsiMismatch,
    /// Single AIS position in the window, suggesting intermittent transmission
    AisGap,
    /// Analyst-flagged identity, overriding the heuristics
    UnusualBehavior,
}

/// Spatio-temporal matching thresholds for detection/track correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Maximum distance between a detection and an AIS candidate (nm)
    #[serde(default = "default_max_match_distance")]
    pub max_match_distance_nm: f64,
    /// Maximum time difference between a detection and an AIS candidate (minutes)
    #[serde(default = "default_max_match_time_diff")]
    pub max_match_time_diff_minutes: f64,
}

fn default_max_match_distance() -> f64 {
    1.0
}

fn default_max_match_time_diff() -> f64 {
    30.0
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            max_match_distance_nm: default_max_match_distance(),
            max_match_time_diff_minutes: default_max_match_time_diff(),
        }
    }
}

/// One dark-vessel finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkVesselAnomaly {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    /// The triggering detection; absent for AIS-only anomalies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection: Option<ExternalDetection>,
    /// AIS track reference if applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mmsi: Option<Mmsi>,
    pub description: String,
    pub severity: Severity,
    pub metadata: serde_json::Value,
}

/// Correlate sensor detections against AIS tracks and flag anomalies.
///
/// `forced_dark` is the analyst-maintained identity override set; it is
/// injected rather than read from global state so callers and tests can
/// vary it per run.
pub fn detect_dark_vessels(
    ais_positions: &[PositionReport],
    detections: &[ExternalDetection],
    forced_dark: &HashSet<Mmsi>,
    config: &CorrelationConfig,
) -> Vec<DarkVesselAnomaly> {
    let mut anomalies = Vec::new();
    let by_mmsi = index_positions(ais_positions);

    // 1. Sensor detections with no AIS correlation.
    for detection in detections {
        if let Some(mmsi) = &detection.mmsi {
            if by_mmsi.contains_key(mmsi) {
                continue;
            }
        }
        if find_nearest_ais_match(detection, ais_positions, config).is_none() {
            anomalies.push(DarkVesselAnomaly {
                anomaly_type: AnomalyType::NoAisMatch,
                detection: Some(detection.clone()),
                mmsi: None,
                description:
                    "Sensor detection without corresponding AIS track (potential dark vessel)."
                        .to_string(),
                severity: Severity::High,
                metadata: json!({
                    "inferred_type": detection.inferred_type,
                    "source": detection.source,
                }),
            });
        }
    }

    // 2. Identities with a single AIS point in the window.
    for (mmsi, track) in &by_mmsi {
        if track.len() == 1 {
            anomalies.push(DarkVesselAnomaly {
                anomaly_type: AnomalyType::AisGap,
                detection: None,
                mmsi: Some((*mmsi).clone()),
                description:
                    "Single AIS point in interval (possible intermittent transmission)."
                        .to_string(),
                severity: Severity::Medium,
                metadata: json!({ "timestamp": track[0].timestamp }),
            });
        }
    }

    // 3. Analyst-flagged identities, at most one anomaly per identity per run.
    for forced in forced_dark {
        if !by_mmsi.contains_key(forced) {
            continue;
        }
        let already = anomalies.iter().any(|a| {
            a.mmsi.as_ref() == Some(forced) && a.anomaly_type == AnomalyType::UnusualBehavior
        });
        if !already {
            anomalies.push(DarkVesselAnomaly {
                anomaly_type: AnomalyType::UnusualBehavior,
                detection: None,
                mmsi: Some(forced.clone()),
                description: "Manually flagged as dark (forced override).".to_string(),
                severity: Severity::High,
                metadata: json!({ "reason": "forced_dark_list" }),
            });
        }
    }

    anomalies
}

fn index_positions<'a>(
    positions: &'a [PositionReport],
) -> HashMap<&'a Mmsi, Vec<&'a PositionReport>> {
    let mut by_mmsi: HashMap<&Mmsi, Vec<&PositionReport>> = HashMap::new();
    for position in positions {
        by_mmsi.entry(&position.mmsi).or_default().push(position);
    }
    by_mmsi
}

/// Nearest spatio-temporal AIS candidate for a detection, or `None` when no
/// position qualifies under the configured thresholds.
///
/// Candidates are scored as `distance_nm + time_diff_minutes / 60` and the
/// minimum-score candidate wins.
fn find_nearest_ais_match<'a>(
    detection: &ExternalDetection,
    ais_positions: &'a [PositionReport],
    config: &CorrelationConfig,
) -> Option<&'a PositionReport> {
    let mut best: Option<(&PositionReport, f64)> = None;

    for position in ais_positions {
        let time_diff_minutes = (position.timestamp - detection.timestamp)
            .num_milliseconds()
            .abs() as f64
            / 60_000.0;
        if time_diff_minutes > config.max_match_time_diff_minutes {
            continue;
        }
        let dist = distance_nm(detection.point(), position.point());
        if dist > config.max_match_distance_nm {
            continue;
        }
        let score = dist + time_diff_minutes / 60.0;
        if best.map_or(true, |(_, s)| score < s) {
            best = Some((position, score));
        }
    }

    best.map(|(position, _)| position)
}
