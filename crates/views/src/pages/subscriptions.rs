//! Plans, the current subscription, and plan changes.

use learnhub_core::polling::CATALOG_STALE_TIME;
use learnhub_core::subscription::{BillingPeriod, ChangePlanRequest, Plan, Subscription};
use learnhub_core::types::DbId;
use learnhub_query::{Query, ViewState};

use crate::context::AppContext;
use crate::error::ViewError;
use crate::keys;

pub struct SubscriptionsPage {
    ctx: AppContext,
    plans: Query<Vec<Plan>>,
    current: Query<Option<Subscription>>,
}

impl SubscriptionsPage {
    pub fn new(ctx: &AppContext) -> Self {
        let plans = ctx
            .query(keys::subscription_plans(), |api| async move {
                api.subscription_plans().await
            })
            .stale_time(CATALOG_STALE_TIME);
        let current = ctx.query(keys::my_subscription(), |api| async move {
            api.my_subscription().await
        });

        Self {
            ctx: ctx.clone(),
            plans,
            current,
        }
    }

    pub fn plans(&self) -> &Query<Vec<Plan>> {
        &self.plans
    }

    pub fn current(&self) -> &Query<Option<Subscription>> {
        &self.current
    }

    pub async fn load_plans(&self) -> ViewState<Vec<Plan>> {
        ViewState::from_state(&self.plans.fetch().await)
    }

    /// `Empty` when the user has no subscription.
    pub async fn load_current(&self) -> ViewState<Option<Subscription>> {
        ViewState::from_state(&self.current.fetch().await)
    }

    pub async fn cancel(&self, subscription_id: DbId) -> Result<Subscription, ViewError> {
        let subscription = self
            .ctx
            .mutation(|api, id: DbId| async move { api.cancel_subscription(id).await })
            .invalidates(keys::subscriptions())
            .success_message_with(|s: &Subscription| {
                if s.cancel_at_period_end {
                    "Subscription will end at the close of the current period".to_string()
                } else {
                    "Subscription cancelled".to_string()
                }
            })
            .error_context("Failed to cancel subscription")
            .mutate(subscription_id)
            .await?;
        Ok(subscription)
    }

    pub async fn change_plan(
        &self,
        plan_id: DbId,
        billing_period: BillingPeriod,
    ) -> Result<Subscription, ViewError> {
        let subscription = self
            .ctx
            .mutation(|api, request: ChangePlanRequest| async move {
                api.change_plan(&request).await
            })
            .invalidates(keys::subscriptions())
            .success_message_with(|s: &Subscription| match &s.plan_name {
                Some(name) => format!("Switched to {name}"),
                None => "Plan changed".to_string(),
            })
            .error_context("Failed to change plan")
            .mutate(ChangePlanRequest {
                plan_id,
                billing_period,
            })
            .await?;
        Ok(subscription)
    }

    /// All subscriptions, for administrators.
    pub fn admin_subscriptions(&self) -> Query<Vec<Subscription>> {
        self.ctx.query(keys::admin_subscriptions(), |api| async move {
            api.admin_list_subscriptions().await
        })
    }
}
