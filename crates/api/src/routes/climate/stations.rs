use axum::{extract::State, Json};
use climate_core::Predicate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{routes::ApiError, AppState, ErrorResponse};

#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
pub struct StationsResponse {
    pub stations: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station id, in table order", content_type = "application/json", body = StationsResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the data source", body = ErrorResponse)
    ))]
pub async fn stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StationsResponse>, ApiError> {
    let stations = state
        .projector
        .project_station_list(&Predicate::all())
        .await?;

    Ok(Json(StationsResponse { stations }))
}
