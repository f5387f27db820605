//! `/admin/*`: course, lesson, video and subscription administration.

use learnhub_core::course::{Course, CourseForm, CoursePatch, Lesson, LessonForm, UploadedVideo};
use learnhub_core::subscription::Subscription;
use learnhub_core::types::DbId;
use learnhub_core::upload::validate_video_upload;
use reqwest::multipart::{Form, Part};

use crate::api::ApiClient;
use crate::error::ApiError;

/// A video file ready to upload.
#[derive(Debug, Clone)]
pub struct VideoFile {
    pub file_name: String,
    /// Explicit MIME type; guessed from the extension when `None`.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ApiClient {
    // ---- courses ----

    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get("/admin/courses").await
    }

    pub async fn create_course(&self, form: CourseForm) -> Result<Course, ApiError> {
        let form = form.validated()?;
        self.post("/admin/courses", &form).await
    }

    pub async fn update_course(&self, id: DbId, patch: &CoursePatch) -> Result<Course, ApiError> {
        self.patch(&format!("/admin/courses/{id}"), patch).await
    }

    pub async fn delete_course(&self, id: DbId) -> Result<(), ApiError> {
        self.delete(&format!("/admin/courses/{id}")).await
    }

    // ---- lessons ----

    pub async fn list_lessons(&self, course_id: DbId) -> Result<Vec<Lesson>, ApiError> {
        self.get_with_query("/admin/lessons", &[("course_id", course_id)])
            .await
    }

    pub async fn create_lesson(&self, form: LessonForm) -> Result<Lesson, ApiError> {
        let form = form.validated()?;
        self.post("/admin/lessons", &form).await
    }

    pub async fn update_lesson(&self, id: DbId, form: LessonForm) -> Result<Lesson, ApiError> {
        let form = form.validated()?;
        self.patch(&format!("/admin/lessons/{id}"), &form).await
    }

    pub async fn delete_lesson(&self, id: DbId) -> Result<(), ApiError> {
        self.delete(&format!("/admin/lessons/{id}")).await
    }

    // ---- uploads ----

    /// Upload a lesson video as `multipart/form-data`.
    ///
    /// Type and size are validated first; a rejected file never leaves
    /// the client.
    pub async fn upload_video(&self, file: VideoFile) -> Result<UploadedVideo, ApiError> {
        let mime = validate_video_upload(
            &file.file_name,
            file.content_type.as_deref(),
            file.bytes.len() as u64,
        )?;

        tracing::info!(
            file_name = %file.file_name,
            size_bytes = file.bytes.len(),
            mime,
            "Uploading lesson video",
        );

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(mime)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let form = Form::new().part("file", part);

        self.post_multipart("/admin/videos/upload", form).await
    }

    // ---- subscriptions ----

    pub async fn admin_list_subscriptions(&self) -> Result<Vec<Subscription>, ApiError> {
        self.get("/admin/subscriptions").await
    }
}
