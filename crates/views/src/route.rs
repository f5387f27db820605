use std::fmt;

use learnhub_core::practice::practice_session_route;
use learnhub_core::types::DbId;

/// Navigation targets produced by page actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    PracticeSession { session_id: String },
    CollaborationSession { session_id: String },
    CourseLessons { course_id: DbId },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::PracticeSession { session_id } => practice_session_route(session_id),
            Self::CollaborationSession { session_id } => {
                format!("/collaboration/sessions/{session_id}")
            }
            Self::CourseLessons { course_id } => format!("/admin/courses/{course_id}/lessons"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
