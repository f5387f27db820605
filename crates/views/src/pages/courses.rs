//! Course administration: list, create, publish and delete courses.

use learnhub_core::course::{Course, CourseForm, CoursePatch};
use learnhub_core::types::DbId;
use learnhub_query::reconcile::{KeepOptimistic, ServerItemWins};
use learnhub_query::{Query, QueryObserver, ViewState};

use crate::context::AppContext;
use crate::error::ViewError;
use crate::keys;

pub struct CourseAdminPage {
    ctx: AppContext,
    courses: Query<Vec<Course>>,
}

impl CourseAdminPage {
    pub fn new(ctx: &AppContext) -> Self {
        let courses = ctx.query(keys::courses(), |api| async move { api.list_courses().await });
        Self {
            ctx: ctx.clone(),
            courses,
        }
    }

    pub fn courses(&self) -> &Query<Vec<Course>> {
        &self.courses
    }

    pub async fn load(&self) -> ViewState<Vec<Course>> {
        ViewState::from_state(&self.courses.fetch().await)
    }

    pub fn observe(&self) -> QueryObserver<Vec<Course>> {
        self.ctx.observe(&self.courses)
    }

    pub async fn create(&self, form: CourseForm) -> Result<Course, ViewError> {
        let form = form.validated()?;
        let course = self
            .ctx
            .mutation(|api, form: CourseForm| async move { api.create_course(form).await })
            .invalidates(keys::courses())
            .invalidates(keys::instructor_courses())
            .success_message_with(|course: &Course| format!("Course \"{}\" created", course.title))
            .error_context("Failed to create course")
            .mutate(form)
            .await?;
        Ok(course)
    }

    /// Publish or unpublish, showing the new state before the server answers.
    pub async fn set_published(&self, course_id: DbId, publish: bool) -> Result<Course, ViewError> {
        let patch = CoursePatch::publish(publish);
        let optimistic = patch.clone();
        let message = if publish { "Course published" } else { "Course unpublished" };

        let course = self
            .ctx
            .mutation(|api, (id, patch): (DbId, CoursePatch)| async move {
                api.update_course(id, &patch).await
            })
            .invalidates(keys::courses())
            .invalidates(keys::instructor_courses())
            .success_message(message)
            .error_context("Failed to update course")
            .mutate_optimistic(
                (course_id, patch),
                &keys::courses(),
                |list: &Vec<Course>| {
                    list.iter()
                        .map(|c| if c.id == course_id { optimistic.apply_to(c) } else { c.clone() })
                        .collect()
                },
                ServerItemWins,
            )
            .await?;
        Ok(course)
    }

    /// Delete a course, removing it from the list right away.
    pub async fn delete(&self, course_id: DbId) -> Result<(), ViewError> {
        self.ctx
            .mutation(|api, id: DbId| async move { api.delete_course(id).await })
            .invalidates(keys::courses())
            .invalidates(keys::instructor_courses())
            .success_message("Course deleted")
            .error_context("Failed to delete course")
            .mutate_optimistic(
                course_id,
                &keys::courses(),
                |list: &Vec<Course>| list.iter().filter(|c| c.id != course_id).cloned().collect(),
                KeepOptimistic,
            )
            .await?;
        Ok(())
    }
}
