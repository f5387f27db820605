//! `/subscriptions/*`.

use learnhub_core::subscription::{ChangePlanRequest, Plan, Subscription};
use learnhub_core::types::DbId;

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn subscription_plans(&self) -> Result<Vec<Plan>, ApiError> {
        self.get("/subscriptions/plans").await
    }

    /// The caller's subscription; `None` when they have never subscribed.
    pub async fn my_subscription(&self) -> Result<Option<Subscription>, ApiError> {
        match self.get("/subscriptions/me").await {
            Err(e) if e.is_not_found() => Ok(None),
            other => other,
        }
    }

    pub async fn cancel_subscription(&self, id: DbId) -> Result<Subscription, ApiError> {
        self.post_empty(&format!("/subscriptions/{id}/cancel")).await
    }

    pub async fn change_plan(&self, request: &ChangePlanRequest) -> Result<Subscription, ApiError> {
        self.post("/subscriptions/change-plan", request).await
    }
}
