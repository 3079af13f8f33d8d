//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    DarkVesselsResponse, HealthResponse, PositionsResponse, StaticInfoQuery, WindowQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{ConsistencyReport, Mmsi, StaticInfo, WindowAnalysis};
use crate::models::time::parse_compact_utc;
use crate::services::analyzer;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        provider: state.config.provider.kind.clone(),
    }))
}

// =============================================================================
// Positions
// =============================================================================

/// GET /v1/positions?bbox=&start=&end=&min_speed=
///
/// Raw AIS positions for a bounding box and time window.
pub async fn get_positions(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> HandlerResult<PositionsResponse> {
    let position_query = query.to_position_query().map_err(AppError::BadRequest)?;
    let positions = state.provider.fetch_positions(&position_query).await?;
    let count = positions.len();

    Ok(Json(PositionsResponse { positions, count }))
}

// =============================================================================
// Analysis
// =============================================================================

/// GET /v1/analysis?bbox=&start=&end=&min_speed=
///
/// Full window analysis: classified vessels, dark-vessel anomalies and
/// consistency reports.
pub async fn get_analysis(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> HandlerResult<WindowAnalysis> {
    let position_query = query.to_position_query().map_err(AppError::BadRequest)?;
    let analysis =
        analyzer::analyze_window(state.provider.as_ref(), &position_query, &state.config).await?;

    Ok(Json(analysis))
}

/// GET /v1/dark-vessels?bbox=&start=&end=&min_speed=
///
/// Dark-vessel anomalies only.
pub async fn get_dark_vessels(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> HandlerResult<DarkVesselsResponse> {
    let position_query = query.to_position_query().map_err(AppError::BadRequest)?;
    let analysis =
        analyzer::analyze_window(state.provider.as_ref(), &position_query, &state.config).await?;
    let count = analysis.anomalies.len();

    Ok(Json(DarkVesselsResponse {
        anomalies: analysis.anomalies,
        count,
    }))
}

// =============================================================================
// Per-vessel endpoints
// =============================================================================

/// GET /v1/vessels/{mmsi}/static?at=
///
/// Declared static info for one vessel near an instant.
pub async fn get_vessel_static(
    State(state): State<AppState>,
    Path(mmsi): Path<String>,
    Query(query): Query<StaticInfoQuery>,
) -> HandlerResult<StaticInfo> {
    let at = parse_compact_utc(&query.at).map_err(AppError::BadRequest)?;
    let mmsi = Mmsi::new(mmsi);

    let info = state.provider.fetch_static_info(&mmsi, at).await?;
    info.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No static info for {}", mmsi)))
}

/// GET /v1/vessels/{mmsi}/report?bbox=&start=&end=&min_speed=
///
/// Consistency report for one vessel over the window. 404 when the vessel
/// has no positions in the window.
pub async fn get_vessel_report(
    State(state): State<AppState>,
    Path(mmsi): Path<String>,
    Query(query): Query<WindowQuery>,
) -> HandlerResult<ConsistencyReport> {
    let position_query = query.to_position_query().map_err(AppError::BadRequest)?;
    let mmsi = Mmsi::new(mmsi);

    let analysis =
        analyzer::analyze_window(state.provider.as_ref(), &position_query, &state.config).await?;
    analysis
        .reports
        .into_iter()
        .find(|report| report.mmsi == mmsi)
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!("No positions for {} in the requested window", mmsi))
        })
}
