//! Reading Routes
//!
//! Endpoints for recording and listing a device's readings.
//!
//! - POST /api/v1/devices/:device_uuid/readings - Record a reading
//! - GET /api/v1/devices/:device_uuid/readings - List readings

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{CreateReadingRequest, ReadingsParams};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::query::ReadingQueryService;
use crate::storage::Reading;

/// POST /api/v1/devices/:device_uuid/readings
///
/// Record a reading. `date_created` defaults to now.
pub async fn create_reading(
    State(state): State<Arc<AppState>>,
    Path(device_uuid): Path<String>,
    body: Result<Json<CreateReadingRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Reading>)> {
    let Json(req) = body?;
    let sensor_type = req.validate()?;

    let timestamp = req.date_created.unwrap_or_else(|| Utc::now().timestamp());
    let reading = Reading::with_timestamp(device_uuid, sensor_type, req.value, timestamp);

    ReadingQueryService::new(&state.store).record(&reading)?;

    Ok((StatusCode::CREATED, Json(reading)))
}

/// GET /api/v1/devices/:device_uuid/readings
///
/// List readings, optionally filtered by `type`, `start` and `end`.
pub async fn list_readings(
    State(state): State<Arc<AppState>>,
    Path(device_uuid): Path<String>,
    params: Result<Query<ReadingsParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Reading>>> {
    let Query(params) = params?;
    let filter = params.filter()?;
    let readings = ReadingQueryService::new(&state.store).all(&device_uuid, &filter)?;
    Ok(Json(readings))
}
