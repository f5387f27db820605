//! Instructor assessment templates and runs.
//!
//! Runs are graded asynchronously on the backend, so the client polls a
//! run until its status becomes terminal.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::validation::validate_form;

/// Lifecycle of an assessment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    InProgress,
    Grading,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Terminal runs no longer change and stop being polled.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    ShortAnswer,
    Code,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: DbId,
    pub kind: QuestionKind,
    pub prompt: String,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentTemplate {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRun {
    pub id: DbId,
    pub template_id: DbId,
    pub status: RunStatus,
    #[serde(default)]
    pub submitted_count: u32,
    #[serde(default)]
    pub graded_count: u32,
    #[serde(default)]
    pub started_at: Option<Timestamp>,
    #[serde(default)]
    pub finished_at: Option<Timestamp>,
}

/// Body of `POST /instructor/assessments/templates`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct TemplateForm {
    pub course_id: DbId,
    #[validate(length(min = 1, max = 200, message = "Assessment title is required"))]
    pub title: String,
    #[validate(range(min = 1, max = 200, message = "Question count must be between 1 and 200"))]
    pub question_count: u32,
}

impl TemplateForm {
    pub fn validated(mut self) -> Result<Self, CoreError> {
        self.title = self.title.trim().to_string();
        validate_form(&self)?;
        Ok(self)
    }
}
