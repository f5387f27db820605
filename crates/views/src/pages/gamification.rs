//! XP, streaks, badges and the leaderboard.

use learnhub_core::gamification::{GamificationStats, LeaderboardEntry, LeaderboardPeriod};
use learnhub_core::polling::GAMIFICATION_POLL_INTERVAL;
use learnhub_query::{Query, QueryObserver, ViewState};

use crate::context::AppContext;
use crate::keys;

pub struct GamificationPage {
    ctx: AppContext,
    stats: Query<GamificationStats>,
}

impl GamificationPage {
    pub fn new(ctx: &AppContext) -> Self {
        let stats = ctx
            .query(keys::gamification_stats(), |api| async move {
                api.gamification_stats().await
            })
            .refetch_interval(GAMIFICATION_POLL_INTERVAL);
        Self {
            ctx: ctx.clone(),
            stats,
        }
    }

    pub fn stats(&self) -> &Query<GamificationStats> {
        &self.stats
    }

    pub fn leaderboard(&self, period: LeaderboardPeriod) -> Query<Vec<LeaderboardEntry>> {
        self.ctx
            .query(keys::leaderboard(period), move |api| async move {
                api.leaderboard(period).await
            })
            .refetch_interval(GAMIFICATION_POLL_INTERVAL)
    }

    pub async fn load(&self) -> ViewState<GamificationStats> {
        ViewState::from_single(&self.stats.fetch().await)
    }

    pub async fn load_leaderboard(&self, period: LeaderboardPeriod) -> ViewState<Vec<LeaderboardEntry>> {
        ViewState::from_state(&self.leaderboard(period).fetch().await)
    }

    pub fn observe(&self) -> QueryObserver<GamificationStats> {
        self.ctx.observe(&self.stats)
    }
}
