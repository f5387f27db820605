//! Cache keys for every resource the pages read.
//!
//! Keys nest so that invalidating a parent (e.g. [`courses`]) also
//! invalidates its children (e.g. [`lessons`]).

use learnhub_core::gamification::LeaderboardPeriod;
use learnhub_core::types::DbId;
use learnhub_query::QueryKey;

pub fn courses() -> QueryKey {
    QueryKey::new("courses")
}

pub fn lessons(course_id: DbId) -> QueryKey {
    courses().with(course_id).with("lessons")
}

pub fn practice_link(code: &str) -> QueryKey {
    QueryKey::new("practice").with("link").with(code)
}

pub fn collaboration_session(session_id: &str) -> QueryKey {
    QueryKey::new("collaboration").with(session_id)
}

pub fn analytics() -> QueryKey {
    QueryKey::new("analytics")
}

pub fn analytics_overview() -> QueryKey {
    analytics().with("overview")
}

pub fn analytics_realtime() -> QueryKey {
    analytics().with("realtime")
}

pub fn instructor_courses() -> QueryKey {
    QueryKey::new("instructor").with("courses")
}

pub fn instructor_lessons(course_id: DbId) -> QueryKey {
    instructor_courses().with(course_id).with("lessons")
}

pub fn invitations(course_id: DbId) -> QueryKey {
    instructor_courses().with(course_id).with("invitations")
}

pub fn join_links(course_id: DbId) -> QueryKey {
    instructor_courses().with(course_id).with("join-links")
}

pub fn transcriptions() -> QueryKey {
    QueryKey::new("instructor").with("transcriptions")
}

pub fn assessment_templates() -> QueryKey {
    QueryKey::new("assessments").with("templates")
}

pub fn assessment_templates_for(course_id: Option<DbId>) -> QueryKey {
    match course_id {
        Some(id) => assessment_templates().param("course_id", id),
        None => assessment_templates(),
    }
}

pub fn assessment_run(run_id: DbId) -> QueryKey {
    QueryKey::new("assessments").with("runs").with(run_id)
}

pub fn gamification() -> QueryKey {
    QueryKey::new("gamification")
}

pub fn gamification_stats() -> QueryKey {
    gamification().with("stats")
}

pub fn leaderboard(period: LeaderboardPeriod) -> QueryKey {
    gamification()
        .with("leaderboard")
        .param("period", period.as_str())
}

pub fn subscriptions() -> QueryKey {
    QueryKey::new("subscriptions")
}

pub fn subscription_plans() -> QueryKey {
    subscriptions().with("plans")
}

pub fn my_subscription() -> QueryKey {
    subscriptions().with("me")
}

pub fn admin_subscriptions() -> QueryKey {
    subscriptions().with("admin")
}
