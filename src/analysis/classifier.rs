//! Rule-based movement classification.
//!
//! The classifier is a decision list: an ordered sequence of guarded
//! returns where the first matching rule wins. The ordering is a
//! deliberate tie-break policy (a track can satisfy several rules at
//! once), so rules must not be reordered.

use serde::{Deserialize, Serialize};

use crate::api::{PositionReport, StaticInfo};
use crate::analysis::metrics::TrajectoryMetrics;

/// Movement category verdict for one analyzed vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Stationary,
    Anchored,
    Maneuvering,
    Transit,
    Unknown,
}

/// Classification thresholds. Every threshold is overridable; the defaults
/// are the calibrated values the rule set was tuned against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Below this average speed a track is a stationary candidate (knots)
    #[serde(default = "default_stationary_speed")]
    pub stationary_speed_threshold_knots: f64,
    /// Below this speed a sample counts as dwelling (knots)
    #[serde(default = "default_dwell_speed")]
    pub dwell_speed_threshold_knots: f64,
    /// Minimum covered distance for a transit verdict (nautical miles)
    #[serde(default = "default_min_transit_distance")]
    pub min_transit_distance_nm: f64,
    /// Tracks shorter than this are classified UNKNOWN (minutes)
    #[serde(default = "default_min_duration")]
    pub min_duration_minutes: f64,
    /// Heading dispersion above which a moving track is maneuvering (degrees)
    #[serde(default = "default_maneuvering_heading_std_dev")]
    pub maneuvering_heading_std_dev_deg: f64,
    /// Upper speed bound for an anchored verdict (knots)
    #[serde(default = "default_anchored_max_speed")]
    pub anchored_max_speed_knots: f64,
    /// Maximum drift rate for stationary/anchored verdicts (nm per hour)
    #[serde(default = "default_anchored_max_drift")]
    pub anchored_max_drift_nm_per_hour: f64,
}

fn default_stationary_speed() -> f64 {
    0.5
}

fn default_dwell_speed() -> f64 {
    2.0
}

fn default_min_transit_distance() -> f64 {
    5.0
}

fn default_min_duration() -> f64 {
    15.0
}

fn default_maneuvering_heading_std_dev() -> f64 {
    25.0
}

fn default_anchored_max_speed() -> f64 {
    3.0
}

fn default_anchored_max_drift() -> f64 {
    0.8
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            stationary_speed_threshold_knots: default_stationary_speed(),
            dwell_speed_threshold_knots: default_dwell_speed(),
            min_transit_distance_nm: default_min_transit_distance(),
            min_duration_minutes: default_min_duration(),
            maneuvering_heading_std_dev_deg: default_maneuvering_heading_std_dev(),
            anchored_max_speed_knots: default_anchored_max_speed(),
            anchored_max_drift_nm_per_hour: default_anchored_max_drift(),
        }
    }
}

/// Classify one vessel's movement from its trajectory metrics.
///
/// Positions and static info are accepted for context but the current rule
/// set decides on metrics alone. Returns the verdict together with a
/// human-readable rationale for the matched rule.
pub fn classify_vessel(
    metrics: &TrajectoryMetrics,
    _positions: &[PositionReport],
    _static_info: Option<&StaticInfo>,
    config: &ClassifierConfig,
) -> (Classification, String) {
    let duration_hours = metrics.duration_hours.value();

    if metrics.point_count == 0 || duration_hours * 60.0 < config.min_duration_minutes {
        return (
            Classification::Unknown,
            "Insufficient data duration or points".to_string(),
        );
    }

    if metrics.avg_speed_knots < config.stationary_speed_threshold_knots
        && metrics.total_distance_nm
            < config.anchored_max_drift_nm_per_hour * duration_hours.max(0.1)
    {
        return (
            Classification::Stationary,
            "Very low average speed and minimal positional drift".to_string(),
        );
    }

    if metrics.max_speed_knots <= config.anchored_max_speed_knots
        && metrics.total_distance_nm < config.anchored_max_drift_nm_per_hour * duration_hours
        && metrics.dwell_ratio > 0.7
    {
        return (
            Classification::Anchored,
            "Low speed profile with high dwell ratio and limited drift".to_string(),
        );
    }

    if metrics.total_distance_nm >= config.min_transit_distance_nm
        && metrics.avg_speed_knots >= config.dwell_speed_threshold_knots
    {
        return (
            Classification::Transit,
            "Covered significant distance at sustained speed".to_string(),
        );
    }

    if let Some(heading_std) = metrics.heading_std_dev_deg {
        if heading_std.value() > config.maneuvering_heading_std_dev_deg
            && metrics.avg_speed_knots > config.stationary_speed_threshold_knots
        {
            return (
                Classification::Maneuvering,
                "High heading variance indicative of maneuvering".to_string(),
            );
        }
    }

    (
        Classification::Unknown,
        "Heuristics did not match any category decisively".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Mmsi;
    use crate::models::time::sentinel_epoch;
    use chrono::{Duration, Utc};
    use qtty::{Degrees, Hours};

    fn metrics(
        point_count: usize,
        duration_hours: f64,
        total_distance_nm: f64,
        avg_speed: f64,
        max_speed: f64,
        dwell_ratio: f64,
        heading_std: Option<f64>,
    ) -> TrajectoryMetrics {
        let start = Utc::now();
        TrajectoryMetrics {
            mmsi: Mmsi::new("257000000"),
            point_count,
            start_time: start,
            end_time: start + Duration::milliseconds((duration_hours * 3_600_000.0) as i64),
            duration_hours: Hours::new(duration_hours),
            total_distance_nm,
            avg_speed_knots: avg_speed,
            max_speed_knots: max_speed,
            speed_std_dev_knots: 0.0,
            heading_std_dev_deg: heading_std.map(Degrees::new),
            dwell_ratio,
        }
    }

    fn classify(m: &TrajectoryMetrics) -> Classification {
        classify_vessel(m, &[], None, &ClassifierConfig::default()).0
    }

    #[test]
    fn test_empty_track_is_unknown() {
        let m = TrajectoryMetrics::empty(Mmsi::new("257000000"));
        let (verdict, rationale) = classify_vessel(&m, &[], None, &ClassifierConfig::default());
        assert_eq!(verdict, Classification::Unknown);
        assert!(rationale.contains("Insufficient"));
        assert_eq!(m.start_time, sentinel_epoch());
    }

    #[test]
    fn test_short_duration_is_unknown() {
        // 10 minutes of data, below the 15-minute minimum
        let m = metrics(5, 10.0 / 60.0, 2.0, 8.0, 10.0, 0.0, None);
        assert_eq!(classify(&m), Classification::Unknown);
    }

    #[test]
    fn test_stationary_calibration_example() {
        let m = metrics(20, 2.0, 0.2, 0.1, 0.4, 1.0, None);
        let (verdict, rationale) = classify_vessel(&m, &[], None, &ClassifierConfig::default());
        assert_eq!(verdict, Classification::Stationary);
        assert!(rationale.contains("drift"));
    }

    #[test]
    fn test_transit_calibration_example() {
        let m = metrics(40, 2.0, 20.0, 12.0, 15.0, 0.0, None);
        assert_eq!(classify(&m), Classification::Transit);
    }

    #[test]
    fn test_anchored() {
        // Low speed, high dwell, drift below 0.8 nm/h over 4 hours, but
        // average speed above the stationary threshold.
        let m = metrics(30, 4.0, 2.0, 0.9, 2.5, 0.9, None);
        assert_eq!(classify(&m), Classification::Anchored);
    }

    #[test]
    fn test_maneuvering() {
        // Moving with scattered headings but too little distance for transit.
        let m = metrics(30, 2.0, 3.0, 1.5, 4.0, 0.2, Some(40.0));
        assert_eq!(classify(&m), Classification::Maneuvering);
    }

    #[test]
    fn test_transit_wins_over_maneuvering() {
        // Qualifies for both transit and maneuvering; the transit rule is
        // evaluated first and must win.
        let m = metrics(40, 2.0, 20.0, 12.0, 15.0, 0.0, Some(40.0));
        assert_eq!(classify(&m), Classification::Transit);
    }

    #[test]
    fn test_stationary_wins_over_anchored() {
        // Satisfies both rule 2 and rule 3; rule 2 comes first.
        let m = metrics(30, 2.0, 0.1, 0.2, 1.0, 1.0, None);
        assert_eq!(classify(&m), Classification::Stationary);
    }

    #[test]
    fn test_inconclusive_fallback() {
        // Slow drift over a long window, no headings, too fast for
        // stationary, too loose for anchored, too slow for transit.
        let m = metrics(30, 6.0, 6.0, 1.0, 4.0, 0.3, None);
        let (verdict, rationale) = classify_vessel(&m, &[], None, &ClassifierConfig::default());
        assert_eq!(verdict, Classification::Unknown);
        assert!(rationale.contains("decisively"));
    }

    #[test]
    fn test_threshold_override() {
        let config = ClassifierConfig {
            min_transit_distance_nm: 30.0,
            ..ClassifierConfig::default()
        };
        let m = metrics(40, 2.0, 20.0, 12.0, 15.0, 0.0, None);
        let (verdict, _) = classify_vessel(&m, &[], None, &config);
        assert_eq!(verdict, Classification::Unknown);
    }

    #[test]
    fn test_classification_serialization() {
        assert_eq!(
            serde_json::to_string(&Classification::Stationary).unwrap(),
            "\"STATIONARY\""
        );
        assert_eq!(
            serde_json::from_str::<Classification>("\"TRANSIT\"").unwrap(),
            Classification::Transit
        );
    }

    #[test]
    fn test_partial_config_toml_uses_defaults() {
        let config: ClassifierConfig =
            toml::from_str("min_transit_distance_nm = 10.0").unwrap();
        assert_eq!(config.min_transit_distance_nm, 10.0);
        assert_eq!(config.stationary_speed_threshold_knots, 0.5);
        assert_eq!(config.anchored_max_drift_nm_per_hour, 0.8);
    }
}
