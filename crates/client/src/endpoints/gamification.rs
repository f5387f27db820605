//! `/gamification/*`.

use learnhub_core::gamification::{GamificationStats, LeaderboardEntry, LeaderboardPeriod};

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn gamification_stats(&self) -> Result<GamificationStats, ApiError> {
        self.get("/gamification/stats").await
    }

    pub async fn leaderboard(
        &self,
        period: LeaderboardPeriod,
    ) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.get_with_query("/gamification/leaderboard", &[("period", period.as_str())])
            .await
    }
}
