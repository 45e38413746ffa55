//! Statistics Routes
//!
//! Per-device reductions. All require `type`; `start` and `end` are optional.
//! A device with no matching readings answers 404 `NO_DATA`.
//!
//! - GET /api/v1/devices/:device_uuid/readings/max
//! - GET /api/v1/devices/:device_uuid/readings/median
//! - GET /api/v1/devices/:device_uuid/readings/mean
//! - GET /api/v1/devices/:device_uuid/readings/quartiles

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ReadingsParams, ValueResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::query::{Quartiles, ReadingQueryService};

pub async fn max_reading(
    State(state): State<Arc<AppState>>,
    Path(device_uuid): Path<String>,
    params: Result<Query<ReadingsParams>, QueryRejection>,
) -> ApiResult<Json<ValueResponse<i64>>> {
    let Query(params) = params?;
    let filter = params.typed_filter()?;
    let value = ReadingQueryService::new(&state.store).require_max(&device_uuid, &filter)?;
    Ok(Json(ValueResponse { value }))
}

pub async fn median_reading(
    State(state): State<Arc<AppState>>,
    Path(device_uuid): Path<String>,
    params: Result<Query<ReadingsParams>, QueryRejection>,
) -> ApiResult<Json<ValueResponse<f64>>> {
    let Query(params) = params?;
    let filter = params.typed_filter()?;
    let value = ReadingQueryService::new(&state.store).median(&device_uuid, &filter)?;
    Ok(Json(ValueResponse { value }))
}

pub async fn mean_reading(
    State(state): State<Arc<AppState>>,
    Path(device_uuid): Path<String>,
    params: Result<Query<ReadingsParams>, QueryRejection>,
) -> ApiResult<Json<ValueResponse<f64>>> {
    let Query(params) = params?;
    let filter = params.typed_filter()?;
    let value = ReadingQueryService::new(&state.store).mean(&device_uuid, &filter)?;
    Ok(Json(ValueResponse { value }))
}

pub async fn quartile_readings(
    State(state): State<Arc<AppState>>,
    Path(device_uuid): Path<String>,
    params: Result<Query<ReadingsParams>, QueryRejection>,
) -> ApiResult<Json<Quartiles>> {
    let Query(params) = params?;
    let filter = params.typed_filter()?;
    let quartiles = ReadingQueryService::new(&state.store).quartiles(&device_uuid, &filter)?;
    Ok(Json(quartiles))
}
