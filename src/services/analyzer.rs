//! Window analysis orchestration.
//!
//! Assembles the full analysis for one query window: fetch positions,
//! group them per vessel, enrich with static identity, classify movement,
//! correlate sensor detections, and score consistency.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::classifier::{classify_vessel, ClassifierConfig};
use crate::analysis::consistency::{build_consistency_report, ConsistencyReport};
use crate::analysis::dark_vessel::{detect_dark_vessels, DarkVesselAnomaly};
use crate::analysis::metrics::compute_trajectory_metrics;
use crate::api::{AnalyzedVessel, ExternalDetection, Mmsi, PositionQuery, PositionReport};
use crate::config::AnalysisConfig;
use crate::providers::VesselDataProvider;

/// Complete analysis output for one query window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowAnalysis {
    pub vessels: Vec<AnalyzedVessel>,
    pub anomalies: Vec<DarkVesselAnomaly>,
    pub reports: Vec<ConsistencyReport>,
    pub position_count: usize,
    pub detection_count: usize,
}

/// Group position reports by vessel identity, preserving first-seen
/// identity order so repeated runs over the same input stay deterministic.
pub fn group_positions_by_mmsi(
    positions: Vec<PositionReport>,
) -> Vec<(Mmsi, Vec<PositionReport>)> {
    let mut order: Vec<Mmsi> = Vec::new();
    let mut groups: std::collections::HashMap<Mmsi, Vec<PositionReport>> =
        std::collections::HashMap::new();

    for position in positions {
        let entry = groups.entry(position.mmsi.clone()).or_default();
        if entry.is_empty() {
            order.push(position.mmsi.clone());
        }
        entry.push(position);
    }

    order
        .into_iter()
        .map(|mmsi| {
            let group = groups.remove(&mmsi).unwrap_or_default();
            (mmsi, group)
        })
        .collect()
}

/// Analyze one vessel: compute metrics, classify, and assemble the result.
///
/// The stored position list is sorted ascending by timestamp.
pub fn analyze_vessel(
    mmsi: Mmsi,
    mut positions: Vec<PositionReport>,
    static_info: Option<crate::api::StaticInfo>,
    config: &ClassifierConfig,
) -> AnalyzedVessel {
    let metrics = compute_trajectory_metrics(&mmsi, &positions);
    let (classification, rationale) =
        classify_vessel(&metrics, &positions, static_info.as_ref(), config);

    positions.sort_by_key(|p| p.timestamp);

    AnalyzedVessel {
        mmsi,
        positions,
        static_info,
        metrics,
        classification,
        rationale,
    }
}

/// Run the full analysis for one query window against a data provider.
///
/// Position fetch failures propagate: without positions there is nothing
/// to analyze. Static-info and detection failures degrade (logged, then
/// treated as absent/empty), so partial upstream outages shrink the
/// analysis instead of failing it.
pub async fn analyze_window(
    provider: &dyn VesselDataProvider,
    query: &PositionQuery,
    config: &AnalysisConfig,
) -> Result<WindowAnalysis> {
    let positions = provider
        .fetch_positions(query)
        .await
        .context("Failed to fetch AIS positions")?;

    let detections = match provider.fetch_detections(&query.bbox, &query.window).await {
        Ok(detections) => detections,
        Err(e) => {
            log::warn!("Detection fetch degraded to empty: {}", e);
            Vec::new()
        }
    };

    let forced_dark: HashSet<Mmsi> = config
        .forced_dark_mmsis
        .iter()
        .map(|m| Mmsi::new(m.clone()))
        .collect();
    let anomalies = detect_dark_vessels(&positions, &detections, &forced_dark, &config.correlation);

    let position_count = positions.len();
    let detection_count = detections.len();

    let mut vessels = Vec::new();
    let mut reports = Vec::new();

    for (mmsi, track) in group_positions_by_mmsi(positions) {
        let static_info = match provider.fetch_static_info(&mmsi, query.window.end).await {
            Ok(info) => info,
            Err(e) => {
                log::warn!("Static info for {} degraded to unknown: {}", mmsi, e);
                None
            }
        };

        let vessel = analyze_vessel(mmsi, track, static_info, &config.classifier);
        let attributed: Vec<ExternalDetection> = detections
            .iter()
            .filter(|d| d.mmsi.as_ref() == Some(&vessel.mmsi))
            .cloned()
            .collect();
        reports.push(build_consistency_report(&vessel, &attributed));
        vessels.push(vessel);
    }

    Ok(WindowAnalysis {
        vessels,
        anomalies,
        reports,
        position_count,
        detection_count,
    })
}
