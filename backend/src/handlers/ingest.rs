//! HTTP handler for the ingestion gateway endpoint

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use shared::IngestReading;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentService;
use crate::services::ingest::{IngestOutcome, IngestService};
use crate::AppState;

/// Accept a batch of raw readings from an authenticated poller.
///
/// The whole batch is validated before storage is touched; the first invalid
/// record rejects the request with the offending index.
pub async fn ingest_readings(
    State(state): State<AppState>,
    current_service: CurrentService,
    Json(readings): Json<Vec<IngestReading>>,
) -> AppResult<(StatusCode, Json<IngestOutcome>)> {
    for (index, reading) in readings.iter().enumerate() {
        reading
            .validate()
            .map_err(|e| AppError::RecordValidation {
                index,
                message: e.to_string(),
            })?;
    }

    let service = IngestService::new(state.db);
    let outcome = service.ingest_batch(&readings).await?;

    tracing::info!(
        service = %current_service.0.service_name,
        received = outcome.received,
        inserted = outcome.inserted,
        "ingest batch stored"
    );

    Ok((StatusCode::CREATED, Json(outcome)))
}
