//! Cleanest-station ranking over the latest rollups

use sqlx::PgPool;

use shared::{rank_stations, StationRanking};

use crate::error::AppResult;
use crate::services::metrics::latest_hourly_per_station;

/// Ranking service
#[derive(Clone)]
pub struct RankingService {
    db: PgPool,
}

impl RankingService {
    /// Create a new RankingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Rank stations ascending by pollution index, cleanest first. Stations
    /// over any fixed reference limit are left out entirely.
    pub async fn cleanest_stations(&self) -> AppResult<Vec<StationRanking>> {
        let metrics = latest_hourly_per_station(&self.db).await?;
        Ok(rank_stations(&metrics))
    }
}
