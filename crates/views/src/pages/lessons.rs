//! Lessons of one course, including video upload.

use learnhub_client::endpoints::admin::VideoFile;
use learnhub_core::course::{Lesson, LessonForm, UploadedVideo};
use learnhub_core::types::DbId;
use learnhub_core::upload::validate_video_upload;
use learnhub_query::reconcile::KeepOptimistic;
use learnhub_query::{Query, QueryObserver, ViewState};

use crate::context::AppContext;
use crate::error::ViewError;
use crate::keys;

pub struct LessonsPage {
    ctx: AppContext,
    course_id: DbId,
    lessons: Query<Vec<Lesson>>,
}

impl LessonsPage {
    pub fn new(ctx: &AppContext, course_id: DbId) -> Self {
        let lessons = ctx.query(keys::lessons(course_id), move |api| async move {
            api.list_lessons(course_id).await
        });
        Self {
            ctx: ctx.clone(),
            course_id,
            lessons,
        }
    }

    pub fn lessons(&self) -> &Query<Vec<Lesson>> {
        &self.lessons
    }

    pub async fn load(&self) -> ViewState<Vec<Lesson>> {
        ViewState::from_state(&self.lessons.fetch().await)
    }

    pub fn observe(&self) -> QueryObserver<Vec<Lesson>> {
        self.ctx.observe(&self.lessons)
    }

    /// Upload a lesson video. Type and size are checked before any bytes
    /// are sent.
    pub async fn upload_video(&self, file: VideoFile) -> Result<UploadedVideo, ViewError> {
        validate_video_upload(
            &file.file_name,
            file.content_type.as_deref(),
            file.bytes.len() as u64,
        )?;

        let uploaded = self
            .ctx
            .mutation(|api, file: VideoFile| async move { api.upload_video(file).await })
            .success_message("Video uploaded")
            .error_context("Video upload failed")
            .mutate(file)
            .await?;
        Ok(uploaded)
    }

    /// Create a lesson, uploading its video first when one is given.
    ///
    /// The form is validated before the upload so a blank title never
    /// costs an upload.
    pub async fn create(
        &self,
        title: &str,
        order: u32,
        video: Option<VideoFile>,
    ) -> Result<Lesson, ViewError> {
        let mut form = LessonForm {
            course_id: self.course_id,
            title: title.to_string(),
            video_url: None,
            order,
        }
        .validated()?;

        if let Some(file) = video {
            form.video_url = Some(self.upload_video(file).await?.video_url);
        }

        let lesson = self
            .ctx
            .mutation(|api, form: LessonForm| async move { api.create_lesson(form).await })
            // Lesson counts on the course list change too.
            .invalidates(keys::courses())
            .invalidates(keys::instructor_courses())
            .success_message_with(|lesson: &Lesson| format!("Lesson \"{}\" created", lesson.title))
            .error_context("Failed to create lesson")
            .mutate(form)
            .await?;
        Ok(lesson)
    }

    pub async fn rename(&self, lesson: &Lesson, title: &str) -> Result<Lesson, ViewError> {
        let form = LessonForm {
            course_id: self.course_id,
            title: title.to_string(),
            video_url: lesson.video_url.clone(),
            order: lesson.order,
        }
        .validated()?;

        let updated = self
            .ctx
            .mutation(|api, (id, form): (DbId, LessonForm)| async move {
                api.update_lesson(id, form).await
            })
            .invalidates(keys::lessons(self.course_id))
            .invalidates(keys::instructor_lessons(self.course_id))
            .success_message("Lesson updated")
            .error_context("Failed to update lesson")
            .mutate((lesson.id, form))
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, lesson_id: DbId) -> Result<(), ViewError> {
        self.ctx
            .mutation(|api, id: DbId| async move { api.delete_lesson(id).await })
            .invalidates(keys::courses())
            .invalidates(keys::instructor_courses())
            .success_message("Lesson deleted")
            .error_context("Failed to delete lesson")
            .mutate_optimistic(
                lesson_id,
                &keys::lessons(self.course_id),
                |list: &Vec<Lesson>| list.iter().filter(|l| l.id != lesson_id).cloned().collect(),
                KeepOptimistic,
            )
            .await?;
        Ok(())
    }
}
