use axum::{
    extract::{Path, State},
    Json,
};
use climate_core::{build_date_range_filter, date_range, Predicate, QueryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{routes::ApiError, AppState, ErrorResponse};

#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
pub struct TempsResponse {
    pub temps: Vec<Option<f64>>,
}

/// Captures of `/temp/{start}` and `/temp/{start}/{end}`
#[derive(Deserialize, Debug)]
pub struct TempPath {
    pub start: String,
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TempRange {
    StartOnly(String),
    StartAndEnd(String, String),
}

impl From<TempPath> for TempRange {
    fn from(path: TempPath) -> Self {
        match path.end {
            Some(end) => TempRange::StartAndEnd(path.start, end),
            None => TempRange::StartOnly(path.start),
        }
    }
}

impl TempRange {
    pub fn predicate(&self) -> Result<Predicate, QueryError> {
        match self {
            TempRange::StartOnly(start) => date_range(start, None),
            TempRange::StartAndEnd(start, end) => date_range(start, Some(end)),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the configured station over the twelve months before the anchor date", content_type = "application/json", body = TempsResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the data source", body = ErrorResponse)
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<TempsResponse>, ApiError> {
    let Some(anchor) = state.projector.resolve_anchor().await? else {
        return Ok(Json(TempsResponse { temps: vec![] }));
    };

    let predicate = build_date_range_filter(None, None, anchor)?;
    let temps = state
        .projector
        .project_temperature_observations(&state.tobs_station, &predicate)
        .await?;

    Ok(Json(TempsResponse { temps }))
}

/// Also mounted at `/api/v1.0/temp/{start}`, which leaves the range open ended
#[utoipa::path(
    get,
    path = "/api/v1.0/temp/{start}/{end}",
    params(
         ("start" = String, Path, description = "First date of the range, YYYY-MM-DD"),
         ("end" = String, Path, description = "Last date of the range, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "[min, avg, max] temperature over the range, nulls when nothing matched", content_type = "application/json", body = TempsResponse),
        (status = BAD_REQUEST, description = "Start or end is not a YYYY-MM-DD date", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the data source", body = ErrorResponse)
    ))]
pub async fn temp_stats(
    State(state): State<Arc<AppState>>,
    Path(path): Path<TempPath>,
) -> Result<Json<TempsResponse>, ApiError> {
    let range = TempRange::from(path);
    let predicate = range.predicate()?;
    let stats = state.projector.project_temperature_stats(&predicate).await?;

    Ok(Json(TempsResponse {
        temps: stats.as_triple(),
    }))
}
