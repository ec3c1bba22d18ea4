//! HTTP handler for the cleanest-station ranking

use axum::{extract::State, Json};

use shared::StationRanking;

use crate::error::AppResult;
use crate::services::RankingService;
use crate::AppState;

/// Rank stations by current cleanliness, best first
pub async fn get_station_ranking(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StationRanking>>> {
    let service = RankingService::new(state.db);
    let ranking = service.cleanest_stations().await?;
    Ok(Json(ranking))
}
