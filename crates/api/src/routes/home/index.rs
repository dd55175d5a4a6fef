use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::{templates::home_page, AnchorDate, AppState};

/// Human readable route listing (GET /)
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let anchor = match state.projector.anchor() {
        AnchorDate::Fixed(date) => date.to_string(),
        AnchorDate::LatestInTable => "latest date in the data set".to_string(),
    };

    Html(home_page(&state.remote_url, &anchor, &state.tobs_station).into_string())
}
