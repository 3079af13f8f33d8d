//! Trajectory metrics: aggregate motion statistics for one vessel track.

use chrono::{DateTime, Utc};
use qtty::{Degrees, Hours};
use serde::{Deserialize, Serialize};

use crate::api::{Mmsi, PositionReport};
use crate::models::geo::distance_nm;
use crate::models::time::sentinel_epoch;

/// Samples strictly below this speed count toward the dwell ratio.
pub const DWELL_SPEED_THRESHOLD_KNOTS: f64 = 2.0;

/// Heading dispersion reported when the mean resultant length collapses to
/// zero (uniformly spread headings), where `sqrt(-2 ln R)` has no value.
pub const MAX_HEADING_STD_DEV_DEG: f64 = 360.0;

/// Aggregate motion statistics derived from one vessel's position reports.
///
/// Numeric fields are rounded for presentation stability: distances and
/// ratios to 3 decimals, speed and heading statistics to 2. Internal
/// computation uses full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryMetrics {
    pub mmsi: Mmsi,
    pub point_count: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: Hours,
    pub total_distance_nm: f64,
    pub avg_speed_knots: f64,
    pub max_speed_knots: f64,
    pub speed_std_dev_knots: f64,
    /// Circular standard deviation of reported headings, present only when
    /// at least two positions carried a heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_std_dev_deg: Option<Degrees>,
    /// Fraction of samples below the dwell speed threshold.
    pub dwell_ratio: f64,
}

impl TrajectoryMetrics {
    /// The defined result for a vessel with no positions in the window:
    /// all numeric fields zero, times at the epoch sentinel.
    pub fn empty(mmsi: Mmsi) -> Self {
        Self {
            mmsi,
            point_count: 0,
            start_time: sentinel_epoch(),
            end_time: sentinel_epoch(),
            duration_hours: Hours::new(0.0),
            total_distance_nm: 0.0,
            avg_speed_knots: 0.0,
            max_speed_knots: 0.0,
            speed_std_dev_knots: 0.0,
            heading_std_dev_deg: None,
            dwell_ratio: 0.0,
        }
    }
}

/// Compute trajectory metrics for one vessel from its (possibly unordered)
/// position reports.
///
/// Positions are stably sorted by timestamp before aggregation, so any
/// permutation of the same report list yields identical output.
pub fn compute_trajectory_metrics(mmsi: &Mmsi, positions: &[PositionReport]) -> TrajectoryMetrics {
    if positions.is_empty() {
        return TrajectoryMetrics::empty(mmsi.clone());
    }

    let mut sorted: Vec<&PositionReport> = positions.iter().collect();
    sorted.sort_by_key(|p| p.timestamp);

    let mut total_distance = 0.0;
    let mut speeds = Vec::with_capacity(sorted.len());
    let mut headings = Vec::new();
    let mut dwell_samples = 0usize;

    for (i, p) in sorted.iter().enumerate() {
        speeds.push(p.speed_knots);
        if let Some(h) = p.heading_deg {
            headings.push(h);
        }
        if p.speed_knots < DWELL_SPEED_THRESHOLD_KNOTS {
            dwell_samples += 1;
        }
        if i > 0 {
            total_distance += distance_nm(sorted[i - 1].point(), p.point());
        }
    }

    let start_time = sorted[0].timestamp;
    let end_time = sorted[sorted.len() - 1].timestamp;
    let duration_hours = (end_time - start_time).num_milliseconds() as f64 / 3_600_000.0;

    let avg_speed = speeds.iter().sum::<f64>() / speeds.len() as f64;
    let max_speed = speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let speed_variance = speeds
        .iter()
        .map(|s| (s - avg_speed) * (s - avg_speed))
        .sum::<f64>()
        / speeds.len() as f64;
    let speed_std_dev = speed_variance.sqrt();

    let dwell_ratio = dwell_samples as f64 / speeds.len() as f64;

    TrajectoryMetrics {
        mmsi: mmsi.clone(),
        point_count: sorted.len(),
        start_time,
        end_time,
        duration_hours: Hours::new(duration_hours),
        total_distance_nm: round_to(total_distance, 3),
        avg_speed_knots: round_to(avg_speed, 2),
        max_speed_knots: round_to(max_speed, 2),
        speed_std_dev_knots: round_to(speed_std_dev, 2),
        heading_std_dev_deg: circular_std_dev_deg(&headings)
            .map(|d| Degrees::new(round_to(d, 2))),
        dwell_ratio: round_to(dwell_ratio, 3),
    }
}

/// Circular standard deviation of headings in degrees, or `None` for fewer
/// than two samples.
///
/// Headings are converted to unit vectors; the dispersion is
/// `sqrt(-2 ln R)` of the mean resultant length R. When R collapses to
/// zero the logarithm has no value and the dispersion is capped at
/// [`MAX_HEADING_STD_DEV_DEG`].
fn circular_std_dev_deg(headings: &[f64]) -> Option<f64> {
    if headings.len() < 2 {
        return None;
    }

    let n = headings.len() as f64;
    let sum_sin: f64 = headings.iter().map(|h| h.to_radians().sin()).sum();
    let sum_cos: f64 = headings.iter().map(|h| h.to_radians().cos()).sum();
    // Float error can push R marginally above 1 for identical headings,
    // which would make ln(R) positive and the square root NaN.
    let resultant = ((sum_sin * sum_sin + sum_cos * sum_cos).sqrt() / n).min(1.0);

    if resultant < 1e-12 {
        return Some(MAX_HEADING_STD_DEV_DEG);
    }

    let circ_std = (-2.0 * resultant.ln()).sqrt();
    Some(circ_std.to_degrees().min(MAX_HEADING_STD_DEV_DEG))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
