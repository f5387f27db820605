//! Subscription plans and billing status as shown on the billing pages.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Monthly,
    Yearly,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trialing,
    Active,
    PastDue,
    Canceled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// Whether the subscriber currently has access to paid content.
    pub fn grants_access(self) -> bool {
        matches!(self, Self::Trialing | Self::Active | Self::PastDue)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: DbId,
    pub name: String,
    /// Price in the smallest currency unit.
    pub price_cents: u64,
    pub currency: String,
    pub billing_period: BillingPeriod,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: DbId,
    pub plan_id: DbId,
    #[serde(default)]
    pub plan_name: Option<String>,
    pub status: SubscriptionStatus,
    pub billing_period: BillingPeriod,
    #[serde(default)]
    pub current_period_end: Option<Timestamp>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// Present on admin listings only.
    #[serde(default)]
    pub user_email: Option<String>,
}

/// Body of `POST /subscriptions/change-plan`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePlanRequest {
    pub plan_id: DbId,
    pub billing_period: BillingPeriod,
}

/// Format a price for display, e.g. `1999, "usd"` -> `"19.99 USD"`.
pub fn format_price(price_cents: u64, currency: &str) -> String {
    format!(
        "{}.{:02} {}",
        price_cents / 100,
        price_cents % 100,
        currency.to_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn past_due_still_has_access() {
        assert!(SubscriptionStatus::PastDue.grants_access());
        assert!(!SubscriptionStatus::Canceled.grants_access());
        assert!(!SubscriptionStatus::Unknown.grants_access());
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(1999, "usd"), "19.99 USD");
        assert_eq!(format_price(500, "eur"), "5.00 EUR");
    }
}
