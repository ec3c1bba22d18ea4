//! HTTP handler for hourly rollup queries

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared::HourlyMetric;

use crate::error::AppResult;
use crate::services::MetricsService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct HourlyMetricsQuery {
    pub limit: Option<i64>,
}

/// Recent hourly rollups for the dashboard collaborator
pub async fn get_hourly_metrics(
    State(state): State<AppState>,
    Query(params): Query<HourlyMetricsQuery>,
) -> AppResult<Json<Vec<HourlyMetric>>> {
    let limit = params.limit.unwrap_or(100).clamp(1, 1000);
    let service = MetricsService::new(state.db);
    let metrics = service.hourly(limit).await?;
    Ok(Json(metrics))
}
