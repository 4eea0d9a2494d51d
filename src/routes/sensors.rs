use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::history::{self, HistoryQuery, SensorSeries};
use crate::reading::{AlertLevel, SensorColumn, SensorDetails};

/// Longest window a history request may ask for (31 days).
pub const MAX_HISTORY_HOURS: u32 = 24 * 31;

/// Dashboard preview: the 15 newest temperature points, labelled as an 8 hour chart.
pub const DASHBOARD_CHART_HOURS: u32 = 8;
pub const DASHBOARD_CHART_POINTS: u64 = 15;

/// Detail view: up to 150 newest points, labelled as a 24 hour chart.
pub const DETAIL_CHART_HOURS: u32 = 24;
pub const DETAIL_CHART_POINTS: u64 = 150;

const DEFAULT_HISTORY_HOURS: u32 = 24;

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryParams {
    /// Lookback window in hours (default 24, max 744)
    pub hours: Option<u32>,
    /// Return only the newest `limit` rows instead of the whole window
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SensorDetailResponse {
    pub sensor: SensorDetails,
    pub latest_value: f64,
    pub alert: AlertLevel,
    pub history: SensorSeries,
}

/// Validate raw query parameters into a history query.
///
/// # Errors
///
/// `BadRequest` for a zero or oversized window, or a zero limit.
pub fn history_query(
    column: SensorColumn,
    hours: Option<u32>,
    limit: Option<u64>,
) -> AppResult<HistoryQuery> {
    let hours = hours.unwrap_or(DEFAULT_HISTORY_HOURS);
    if hours == 0 || hours > MAX_HISTORY_HOURS {
        return Err(AppError::BadRequest(format!(
            "hours must be between 1 and {MAX_HISTORY_HOURS}"
        )));
    }
    if limit == Some(0) {
        return Err(AppError::BadRequest("limit must be positive".to_string()));
    }
    Ok(HistoryQuery::new(column, hours, limit))
}

/// List all sensors
#[utoipa::path(
    get,
    path = "/api/sensors",
    responses(
        (status = 200, description = "Sensor details", body = Vec<SensorDetails>),
    ),
    tag = "sensors"
)]
pub async fn list_sensors() -> Json<Vec<SensorDetails>> {
    Json(SensorColumn::ALL.into_iter().map(SensorColumn::details).collect())
}

/// Sensor detail view
///
/// Details, latest value and the recent series for one sensor.
#[utoipa::path(
    get,
    path = "/api/sensors/{sensor}",
    params(
        ("sensor" = String, Path, description = "Column key or display name, e.g. soil_moisture or Soil Moisture"),
    ),
    responses(
        (status = 200, description = "Sensor detail", body = SensorDetailResponse),
        (status = 404, description = "Unknown sensor"),
    ),
    tag = "sensors"
)]
pub async fn get_sensor(
    State(state): State<AppState>,
    Path(sensor): Path<String>,
) -> AppResult<Json<SensorDetailResponse>> {
    let column: SensorColumn = sensor.parse()?;
    let details = column.details();

    let query = HistoryQuery::tail(column, DETAIL_CHART_HOURS, DETAIL_CHART_POINTS);
    let history = history::history_for(&state.store, &query, Utc::now()).await?;
    let latest_value = state.store.latest().await?.value(column);

    Ok(Json(SensorDetailResponse {
        sensor: details,
        latest_value,
        alert: details.alert_level(latest_value),
        history,
    }))
}

/// Sensor history
///
/// Window mode (all rows within `hours`) unless `limit` is given, in which case the
/// newest `limit` rows are returned. Labels are `HH:MM` up to 24 hours, `DD-MM` above.
#[utoipa::path(
    get,
    path = "/api/sensors/{sensor}/history",
    params(
        ("sensor" = String, Path, description = "Column key or display name"),
        HistoryParams
    ),
    responses(
        (status = 200, description = "Series, oldest first", body = SensorSeries),
        (status = 400, description = "Invalid hours or limit"),
        (status = 404, description = "Unknown sensor"),
    ),
    tag = "sensors"
)]
pub async fn get_sensor_history(
    State(state): State<AppState>,
    Path(sensor): Path<String>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<SensorSeries>> {
    let column: SensorColumn = sensor.parse()?;
    let query = history_query(column, params.hours, params.limit)?;
    let series = history::history_for(&state.store, &query, Utc::now()).await?;
    Ok(Json(series))
}

/// Dashboard chart
///
/// The compact temperature preview shown on the dashboard.
#[utoipa::path(
    get,
    path = "/api/chart_data",
    responses(
        (status = 200, description = "Temperature series, oldest first", body = SensorSeries),
    ),
    tag = "sensors"
)]
pub async fn chart_data(State(state): State<AppState>) -> AppResult<Json<SensorSeries>> {
    let query = HistoryQuery::tail(
        SensorColumn::Temperature,
        DASHBOARD_CHART_HOURS,
        DASHBOARD_CHART_POINTS,
    );
    let series = history::history_for(&state.store, &query, Utc::now()).await?;
    Ok(Json(series))
}
