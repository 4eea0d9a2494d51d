use axum::{
    Form, Json,
    extract::{Query, State},
    http::{
        StatusCode,
        header::{self, HeaderMap, HeaderValue},
    },
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use utoipa::{IntoParams, ToSchema};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::reading::Reading;

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReadingsQuery {
    /// Response format: json (default) or csv
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingsResponse {
    /// Number of stored readings
    pub count: usize,
    /// Readings, newest first
    pub readings: Vec<Reading>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClearRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearResponse {
    /// `success` or `error`
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_deleted: Option<u64>,
}

fn determine_format(query_format: &str, headers: &HeaderMap) -> String {
    // Query parameter takes precedence
    if query_format != "json" {
        return query_format.to_lowercase();
    }

    if let Some(accept) = headers.get(header::ACCEPT)
        && let Ok(accept_str) = accept.to_str()
        && accept_str.contains("text/csv")
    {
        return "csv".to_string();
    }

    "json".to_string()
}

const CSV_HEADER: &str = "timestamp,soil_moisture,temperature,humidity,ph_level,light_level\n";

fn csv_row(r: &Reading) -> String {
    format!(
        "{},{},{},{},{},{}\n",
        r.timestamp.to_rfc3339(),
        r.soil_moisture,
        r.temperature,
        r.humidity,
        r.ph_level,
        r.light_level
    )
}

fn build_csv_response(readings: Vec<Reading>) -> AppResult<Response> {
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<String, std::io::Error>>(100);

    tokio::spawn(async move {
        if tx.send(Ok(CSV_HEADER.to_string())).await.is_err() {
            return;
        }
        for reading in &readings {
            if tx.send(Ok(csv_row(reading))).await.is_err() {
                break;
            }
        }
    });

    let stream = ReceiverStream::new(rx);
    let body = axum::body::Body::from_stream(stream);

    Response::builder()
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))
        .body(body)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Latest reading
///
/// All fields are zero (timestamp at the Unix epoch) while nothing is recorded.
#[utoipa::path(
    get,
    path = "/api/latest_data",
    responses(
        (status = 200, description = "Most recent reading", body = Reading),
    ),
    tag = "readings"
)]
pub async fn latest_data(State(state): State<AppState>) -> AppResult<Json<Reading>> {
    Ok(Json(state.store.latest().await?))
}

/// All stored readings
///
/// Every reading, newest first, as JSON or streamed CSV.
#[utoipa::path(
    get,
    path = "/api/readings",
    params(ReadingsQuery),
    responses(
        (status = 200, description = "Readings retrieved successfully", body = ReadingsResponse),
        (status = 400, description = "Unsupported format"),
    ),
    tag = "readings"
)]
pub async fn list_readings(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let format = determine_format(&query.format, &headers);
    if format != "json" && format != "csv" {
        return Err(AppError::BadRequest(format!(
            "Unsupported format: {format}. Must be json or csv"
        )));
    }

    let readings = state.store.all_newest_first().await?;

    if format == "csv" {
        return build_csv_response(readings);
    }

    Ok(Json(ReadingsResponse {
        count: readings.len(),
        readings,
    })
    .into_response())
}

/// Clear all readings
///
/// Deletes every stored reading when `password` matches the configured secret.
/// Disabled while no secret is configured.
#[utoipa::path(
    post,
    path = "/api/clear-database",
    request_body(content = ClearRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "All readings deleted", body = ClearResponse),
        (status = 403, description = "Wrong password or clearing disabled", body = ClearResponse),
    ),
    tag = "readings"
)]
pub async fn clear_database(
    State(state): State<AppState>,
    Form(request): Form<ClearRequest>,
) -> AppResult<Response> {
    let Some(expected) = state.config.clear_data_password.as_deref() else {
        return Err(AppError::Forbidden(
            "Clearing data is disabled on this server".to_string(),
        ));
    };

    if request.password != expected {
        tracing::warn!("Rejected data clear: wrong password");
        let body = ClearResponse {
            status: "error",
            message: "Incorrect password. The database was NOT cleared.".to_string(),
            rows_deleted: None,
        };
        return Ok((StatusCode::FORBIDDEN, Json(body)).into_response());
    }

    let rows_deleted = state.store.clear().await?;

    Ok(Json(ClearResponse {
        status: "success",
        message: "Database cleared. All sensor data has been removed.".to_string(),
        rows_deleted: Some(rows_deleted),
    })
    .into_response())
}
