//! Summary Route
//!
//! - GET /api/v1/devices/summary - Per-device rollup across all devices

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::ReadingsParams;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::query::{summarize, DeviceSummary};

/// GET /api/v1/devices/summary
///
/// Optional `type`, `start` and `end` apply to every device. Devices left
/// without readings are omitted.
pub async fn readings_summary(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ReadingsParams>, QueryRejection>,
) -> ApiResult<Json<Vec<DeviceSummary>>> {
    let Query(params) = params?;
    let filter = params.filter()?;
    Ok(Json(summarize(&state.store, &filter)?))
}
