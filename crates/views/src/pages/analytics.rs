//! Platform analytics dashboard, refreshed every minute.

use learnhub_core::analytics::{PlatformOverview, RealtimeActivity};
use learnhub_core::polling::ANALYTICS_POLL_INTERVAL;
use learnhub_query::{Query, QueryObserver, ViewState};

use crate::context::AppContext;
use crate::keys;

pub struct AnalyticsDashboard {
    ctx: AppContext,
    overview: Query<PlatformOverview>,
    realtime: Query<RealtimeActivity>,
}

/// Observers for both dashboard panels; dropping it stops polling.
pub struct DashboardObservers {
    pub overview: QueryObserver<PlatformOverview>,
    pub realtime: QueryObserver<RealtimeActivity>,
}

impl AnalyticsDashboard {
    pub fn new(ctx: &AppContext) -> Self {
        let overview = ctx
            .query(keys::analytics_overview(), |api| async move {
                api.platform_overview().await
            })
            .refetch_interval(ANALYTICS_POLL_INTERVAL);
        let realtime = ctx
            .query(keys::analytics_realtime(), |api| async move {
                api.platform_realtime().await
            })
            .refetch_interval(ANALYTICS_POLL_INTERVAL);

        Self {
            ctx: ctx.clone(),
            overview,
            realtime,
        }
    }

    pub fn overview(&self) -> &Query<PlatformOverview> {
        &self.overview
    }

    pub fn realtime(&self) -> &Query<RealtimeActivity> {
        &self.realtime
    }

    pub async fn load(&self) -> (ViewState<PlatformOverview>, ViewState<RealtimeActivity>) {
        let (overview, realtime) = tokio::join!(self.overview.fetch(), self.realtime.fetch());
        (
            ViewState::from_single(&overview),
            ViewState::from_single(&realtime),
        )
    }

    pub fn observe(&self) -> DashboardObservers {
        DashboardObservers {
            overview: self.ctx.observe(&self.overview),
            realtime: self.ctx.observe(&self.realtime),
        }
    }

    /// Manual refresh button.
    pub fn refresh(&self) {
        self.ctx.queries.invalidate(&keys::analytics());
    }
}
