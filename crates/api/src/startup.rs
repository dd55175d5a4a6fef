use crate::{
    db, health, index_handler, precipitation, routes, stations, temp_stats, tobs, AnchorDate,
    ClimateAccess, ClimateData, ResultProjector,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub tobs_station: String,
    pub projector: Arc<ResultProjector>,
}

impl AppState {
    pub fn new(
        climate_db: Arc<dyn ClimateData>,
        anchor: AnchorDate,
        tobs_station: String,
        remote_url: String,
    ) -> Self {
        Self {
            remote_url,
            tobs_station,
            projector: Arc::new(ResultProjector::new(climate_db, anchor)),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::precipitation::precipitation,
        routes::climate::stations::stations,
        routes::climate::temperature::tobs,
        routes::climate::temperature::temp_stats,
        routes::health,
    ),
    components(
        schemas(
                routes::ErrorResponse,
                routes::PrecipitationResponse,
                routes::StationsResponse,
                routes::TempsResponse,
                db::TemperatureStats,
        )
    ),
    tags(
        (name = "climate observation api", description = "a read-only api over station precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    remote_url: String,
    database_path: String,
    anchor: AnchorDate,
    tobs_station: String,
) -> Result<AppState, anyhow::Error> {
    let climate_db = Arc::new(
        ClimateAccess::new(&database_path)
            .await
            .map_err(|e| anyhow!("error opening climate database {}: {}", database_path, e))?,
    );

    Ok(AppState::new(climate_db, anchor, tobs_station, remote_url))
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/temp/{start}", get(temp_stats))
        .route("/api/v1.0/temp/{start}/{end}", get(temp_stats))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, path: {}, time: {}", response.status().as_str(), path, response_time);

    response
}
