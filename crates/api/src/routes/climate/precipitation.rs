use axum::{extract::State, Json};
use climate_core::build_date_range_filter;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use utoipa::ToSchema;

use crate::{routes::ApiError, AppState, ErrorResponse};

#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
pub struct PrecipitationResponse {
    /// Date (YYYY-MM-DD) to inches of precipitation
    pub precipitation: BTreeMap<String, Option<f64>>,
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation for the twelve months before the anchor date", content_type = "application/json", body = PrecipitationResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the data source", body = ErrorResponse)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrecipitationResponse>, ApiError> {
    let Some(anchor) = state.projector.resolve_anchor().await? else {
        return Ok(Json(PrecipitationResponse {
            precipitation: BTreeMap::new(),
        }));
    };

    let predicate = build_date_range_filter(None, None, anchor)?;
    let precipitation = state.projector.project_precipitation(&predicate).await?;

    Ok(Json(PrecipitationResponse { precipitation }))
}
