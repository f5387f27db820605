//! Course and lesson view models plus the admin forms that edit them.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{DbId, Timestamp};
use crate::validation::validate_form;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// A course as listed on the catalog and admin pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Whether students can see the course in the catalog.
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub lesson_count: u32,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// A single lesson within a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    /// Reference returned by the upload endpoint (URL or storage key).
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    /// 1-based position inside the course.
    pub order: u32,
}

/// Response of `POST /admin/videos/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedVideo {
    pub video_url: String,
    #[serde(default)]
    pub duration_secs: Option<u32>,
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Body of `POST /admin/courses`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CourseForm {
    #[validate(length(min = 1, max = 200, message = "Course title is required"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_published: bool,
}

impl CourseForm {
    /// Trim the title and reject the form when a required field is blank.
    pub fn validated(mut self) -> Result<Self, CoreError> {
        self.title = self.title.trim().to_string();
        validate_form(&self)?;
        Ok(self)
    }
}

/// Partial update for `PATCH /admin/courses/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoursePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl CoursePatch {
    /// Patch that only flips the publish flag.
    pub fn publish(is_published: bool) -> Self {
        Self {
            is_published: Some(is_published),
            ..Default::default()
        }
    }

    /// Apply this patch to a cached course, producing the expected
    /// post-update state.
    pub fn apply_to(&self, course: &Course) -> Course {
        let mut next = course.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(description) = &self.description {
            next.description = Some(description.clone());
        }
        if let Some(is_published) = self.is_published {
            next.is_published = is_published;
        }
        next
    }
}

/// Body of `POST /admin/lessons` and `PATCH /admin/lessons/{id}`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LessonForm {
    pub course_id: DbId,
    #[validate(length(min = 1, max = 200, message = "Lesson title is required"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[validate(range(min = 1, message = "Lesson order starts at 1"))]
    pub order: u32,
}

impl LessonForm {
    pub fn validated(mut self) -> Result<Self, CoreError> {
        self.title = self.title.trim().to_string();
        validate_form(&self)?;
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
