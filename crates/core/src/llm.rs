//! AI-assisted tutoring, code review and study guide payloads.
//!
//! Inference runs on the backend; these types only describe the request
//! and response shapes of the `/llm/*` endpoints.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::require_non_blank;

/// Upper bound on submitted code for review, in bytes.
pub const MAX_REVIEW_CODE_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Body of `POST /llm/tutor`.
#[derive(Debug, Clone, Serialize)]
pub struct TutorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<DbId>,
    pub question: String,
    pub history: Vec<ChatTurn>,
}

impl TutorRequest {
    pub fn new(
        lesson_id: Option<DbId>,
        question: &str,
        history: Vec<ChatTurn>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            lesson_id,
            question: require_non_blank(question, "Question")?,
            history,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorReply {
    pub answer: String,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

/// Body of `POST /llm/code-review`.
#[derive(Debug, Clone, Serialize)]
pub struct CodeReviewRequest {
    pub language: String,
    pub code: String,
}

impl CodeReviewRequest {
    pub fn new(language: &str, code: &str) -> Result<Self, CoreError> {
        let language = require_non_blank(language, "Language")?;
        if code.trim().is_empty() {
            return Err(CoreError::Validation("Code is required".to_string()));
        }
        if code.len() > MAX_REVIEW_CODE_BYTES {
            return Err(CoreError::Validation(format!(
                "Code must be at most {} KB",
                MAX_REVIEW_CODE_BYTES / 1024
            )));
        }
        Ok(Self {
            language,
            code: code.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    #[serde(default)]
    pub line: Option<u32>,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeReview {
    pub summary: String,
    #[serde(default)]
    pub comments: Vec<ReviewComment>,
    #[serde(default)]
    pub score: Option<u32>,
}

/// Body of `POST /llm/study-guide`.
#[derive(Debug, Clone, Serialize)]
pub struct StudyGuideRequest {
    pub course_id: DbId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lesson_ids: Vec<DbId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyGuideSection {
    pub heading: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyGuide {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<StudyGuideSection>,
}
