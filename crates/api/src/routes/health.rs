use axum::{extract::State, http::StatusCode};
use log::error;
use std::sync::Arc;

use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Data source answered"),
        (status = SERVICE_UNAVAILABLE, description = "Data source unreachable")
    ))]
pub async fn health(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.projector.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!("health check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
