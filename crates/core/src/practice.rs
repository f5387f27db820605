//! Guest practice links: view models, the join form, and the fixed set
//! of messages shown when a link cannot be joined.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::validation::require_non_blank;

/// Practice codes are URL-safe tokens handed out by instructors.
static PRACTICE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{4,64}$").expect("valid regex"));

/// Maximum display name length accepted by the join form.
pub const MAX_DISPLAY_NAME_LEN: usize = 80;

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// Landing-page data for `GET /practice/link/{code}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeLinkInfo {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub course_title: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub question_count: Option<u32>,
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

/// Body of `POST /practice/link/{code}/join`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinPracticeRequest {
    pub name: String,
}

impl JoinPracticeRequest {
    /// Build a request from raw form input. A blank name is rejected so
    /// that no join request is ever issued for it.
    pub fn from_input(name: &str) -> Result<Self, CoreError> {
        let name = require_non_blank(name, "Display name")?;
        if name.chars().count() > MAX_DISPLAY_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "Display name must be at most {MAX_DISPLAY_NAME_LEN} characters"
            )));
        }
        Ok(Self { name })
    }
}

/// Response of a successful join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeJoinResponse {
    pub session_id: String,
    pub session_token: String,
    #[serde(default)]
    pub participant_id: Option<DbId>,
}

/// Returns `true` if the code has the shape the backend issues.
pub fn is_valid_practice_code(code: &str) -> bool {
    PRACTICE_CODE_RE.is_match(code)
}

/// Route of the practice session page for a joined guest.
pub fn practice_session_route(session_id: &str) -> String {
    format!("/practice/session/{session_id}")
}

// ---------------------------------------------------------------------------
// Join failure mapping
// ---------------------------------------------------------------------------

/// Backend error codes the join flow knows about.
pub mod join_codes {
    pub const LINK_NOT_FOUND: &str = "LINK_NOT_FOUND";
    pub const LINK_EXPIRED: &str = "LINK_EXPIRED";
    pub const LINK_INACTIVE: &str = "LINK_INACTIVE";
    pub const LINK_FULL: &str = "LINK_FULL";
}

/// Why a practice link could not be loaded or joined.
///
/// Every variant maps to one fixed message; raw backend codes never
/// reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinFailure {
    NotFound,
    Expired,
    Inactive,
    Full,
    Rejected,
    Unavailable,
}

impl JoinFailure {
    /// Classify a failed call. `status` is `None` when no response arrived.
    pub fn classify(status: Option<u16>, code: Option<&str>) -> Self {
        match code {
            Some(join_codes::LINK_NOT_FOUND) => return Self::NotFound,
            Some(join_codes::LINK_EXPIRED) => return Self::Expired,
            Some(join_codes::LINK_INACTIVE) => return Self::Inactive,
            Some(join_codes::LINK_FULL) => return Self::Full,
            _ => {}
        }

        match status {
            Some(404) => Self::NotFound,
            Some(410) => Self::Expired,
            Some(409) => Self::Full,
            Some(s) if (400..500).contains(&s) => Self::Rejected,
            _ => Self::Unavailable,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NotFound => "This practice link does not exist.",
            Self::Expired => "This practice link has expired.",
            Self::Inactive => "This practice link is no longer active.",
            Self::Full => "This practice session is full.",
            Self::Rejected => "Unable to join this practice session.",
            Self::Unavailable => "Something went wrong. Please try again.",
        }
    }
}

/// Every message [`JoinFailure::message`] can produce.
pub const JOIN_FAILURE_MESSAGES: &[&str] = &[
    "This practice link does not exist.",
    "This practice link has expired.",
    "This practice link is no longer active.",
    "This practice session is full.",
    "Unable to join this practice session.",
    "Something went wrong. Please try again.",
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
