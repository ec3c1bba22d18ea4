//! Route definitions for the Air Quality Monitor backend

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::require_api_key, AppState};

/// Create API routes. Every route here sits behind the API key middleware;
/// the key is checked before any handler runs.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Ingestion gateway
        .route("/ingest", post(handlers::ingest_readings))
        // Hourly rollups for the dashboard
        .route("/metrics/hourly", get(handlers::get_hourly_metrics))
        // Pending alerts for the dispatcher
        .route("/alerts", get(handlers::get_pending_alerts))
        // Delivery registration (idempotent)
        .route("/alerts/delivered", post(handlers::register_delivered))
        // Latest alert per station
        .route("/alerts/stations/:station_id", get(handlers::get_station_alert))
        // Cleanest-station ranking
        .route("/stations/ranking", get(handlers::get_station_ranking))
        .route_layer(middleware::from_fn_with_state(state, require_api_key))
}
