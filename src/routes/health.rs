use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Number of stored readings
    pub readings: u64,
}

/// Health check endpoint
///
/// Returns 200 with the stored row count when the database answers.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database did not answer in time"),
    ),
    tag = "health"
)]
pub async fn healthz(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let readings = state.store.count().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        readings,
    }))
}
