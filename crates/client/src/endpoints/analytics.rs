//! `/analytics/platform/*`.

use learnhub_core::analytics::{PlatformOverview, RealtimeActivity};

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn platform_overview(&self) -> Result<PlatformOverview, ApiError> {
        self.get("/analytics/platform/overview").await
    }

    pub async fn platform_realtime(&self) -> Result<RealtimeActivity, ApiError> {
        self.get("/analytics/platform/realtime").await
    }
}
