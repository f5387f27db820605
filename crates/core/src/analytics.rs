//! Platform analytics view models for the admin dashboard.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Totals shown on the dashboard overview cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformOverview {
    pub total_users: u64,
    pub active_users_30d: u64,
    pub total_courses: u64,
    pub published_courses: u64,
    pub total_enrollments: u64,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub monthly_revenue_cents: u64,
}

/// Near-real-time activity, refreshed by polling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeActivity {
    pub active_users: u64,
    pub active_sessions: u64,
    #[serde(default)]
    pub lessons_in_progress: u64,
    #[serde(default)]
    pub recent_events: Vec<ActivityEvent>,
    pub generated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub kind: String,
    pub description: String,
    pub occurred_at: Timestamp,
}
