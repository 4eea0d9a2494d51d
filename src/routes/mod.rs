pub mod health;
pub mod readings;
pub mod sensors;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        readings::latest_data,
        readings::list_readings,
        readings::clear_database,
        sensors::list_sensors,
        sensors::get_sensor,
        sensors::get_sensor_history,
        sensors::chart_data,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::reading::Reading,
            crate::reading::SensorColumn,
            crate::reading::SensorDetails,
            crate::reading::AlertLevel,
            crate::history::SensorSeries,
            readings::ReadingsResponse,
            readings::ClearRequest,
            readings::ClearResponse,
            sensors::SensorDetailResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "readings", description = "Latest and stored readings"),
        (name = "sensors", description = "Per-sensor details and history series"),
    ),
    info(
        title = "Greenhouse DB API",
        description = "Synthetic greenhouse sensor readings and chart series",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/latest_data", get(readings::latest_data))
        .route("/chart_data", get(sensors::chart_data))
        .route("/readings", get(readings::list_readings))
        .route("/clear-database", post(readings::clear_database))
        .route("/sensors", get(sensors::list_sensors))
        .route("/sensors/{sensor}", get(sensors::get_sensor))
        .route("/sensors/{sensor}/history", get(sensors::get_sensor_history))
        .layer(RequestBodyLimitLayer::new(64 * 1024));

    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
