//! HTTP handlers for alert queries and delivery registration

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use shared::{AlertCandidate, AlertDelivery};

use crate::error::{AppError, AppResult};
use crate::services::AlertService;
use crate::AppState;

/// Pending alerts payload for the dispatcher.
#[derive(Debug, Serialize)]
pub struct PendingAlertsResponse {
    pub alerts: Vec<AlertDelivery>,
}

/// Acknowledgment of a delivery-registration call.
#[derive(Debug, Serialize)]
pub struct DeliveredResponse {
    pub recorded: u64,
}

/// List the alert triples not yet pushed to the notification channel
pub async fn get_pending_alerts(
    State(state): State<AppState>,
) -> AppResult<Json<PendingAlertsResponse>> {
    let service = AlertService::new(state.db.clone(), &state.config);
    let alerts = service.pending_deliveries().await?;
    Ok(Json(PendingAlertsResponse { alerts }))
}

/// Durably record a batch of delivered alerts (idempotent)
pub async fn register_delivered(
    State(state): State<AppState>,
    Json(deliveries): Json<Vec<AlertDelivery>>,
) -> AppResult<Json<DeliveredResponse>> {
    let service = AlertService::new(state.db.clone(), &state.config);
    let recorded = service.record_delivered(&deliveries).await?;

    tracing::info!(
        submitted = deliveries.len(),
        recorded,
        "delivery registrations stored"
    );

    Ok(Json(DeliveredResponse { recorded }))
}

/// Latest alert for one station, or an explicit 404 when the station is
/// currently clean
pub async fn get_station_alert(
    State(state): State<AppState>,
    Path(station_id): Path<i32>,
) -> AppResult<Json<AlertCandidate>> {
    let service = AlertService::new(state.db.clone(), &state.config);
    let alert = service
        .station_alert(station_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Active alert for station {}", station_id)))?;
    Ok(Json(alert))
}
