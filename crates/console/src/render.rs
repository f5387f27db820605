//! Plain-text rendering of page state for the terminal.

use learnhub_core::analytics::{PlatformOverview, RealtimeActivity};
use learnhub_core::collaboration::CollaborationSession;
use learnhub_core::course::Course;
use learnhub_core::practice::PracticeLinkInfo;
use learnhub_query::{Notification, NotificationLevel, ViewState};

/// Render one query's view state, delegating populated data to `render`.
pub fn view<T>(state: &ViewState<T>, render: impl FnOnce(&T) -> String) -> String {
    match state {
        ViewState::Idle => String::new(),
        ViewState::Loading => "Loading...".to_string(),
        ViewState::Failed(message) => format!("Error: {message}"),
        ViewState::Empty => "Nothing here yet.".to_string(),
        ViewState::Populated(data) => render(data),
    }
}

pub fn notification(n: &Notification) -> String {
    let level = match n.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
        NotificationLevel::Info => "info",
    };
    format!("[{level}] {}", n.message)
}

pub fn courses(courses: &[Course]) -> String {
    courses
        .iter()
        .map(|c| {
            let state = if c.is_published { "published" } else { "draft" };
            format!("#{} {} [{state}] ({} lessons)", c.id, c.title, c.lesson_count)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn practice_link(info: &PracticeLinkInfo) -> String {
    let mut lines = vec![info.title.clone()];
    if let Some(description) = &info.description {
        lines.push(description.clone());
    }
    if let Some(course) = &info.course_title {
        lines.push(format!("Course: {course}"));
    }
    if let Some(instructor) = &info.instructor_name {
        lines.push(format!("Instructor: {instructor}"));
    }
    if let Some(count) = info.question_count {
        lines.push(format!("Questions: {count}"));
    }
    if let Some(minutes) = info.time_limit_minutes {
        lines.push(format!("Time limit: {minutes} min"));
    }
    lines.join("\n")
}

pub fn session(session: &CollaborationSession) -> String {
    let participants = session
        .participants
        .iter()
        .map(|p| p.display_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} v{} [{:?}] participants: {}",
        session.title,
        session.version,
        session.status,
        if participants.is_empty() { "-" } else { &participants },
    )
}

pub fn overview(o: &PlatformOverview) -> String {
    format!(
        "users {} ({} active in 30d), courses {}/{} published, enrollments {}, completion {:.0}%",
        o.total_users,
        o.active_users_30d,
        o.published_courses,
        o.total_courses,
        o.total_enrollments,
        o.completion_rate * 100.0,
    )
}

pub fn realtime(r: &RealtimeActivity) -> String {
    format!(
        "active users {}, sessions {}, lessons in progress {}",
        r.active_users, r.active_sessions, r.lessons_in_progress
    )
}
