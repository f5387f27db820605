//! `/instructor/*`: the instructor's courses, assessments, invitations,
//! join links and transcriptions.

use learnhub_core::assessment::{AssessmentRun, AssessmentTemplate, TemplateForm};
use learnhub_core::course::{Course, Lesson};
use learnhub_core::instructor::{
    CreateJoinLinkRequest, Invitation, InvitationBatch, InvitationBatchResult, JoinLink,
    Transcription,
};
use learnhub_core::types::DbId;

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn instructor_courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get("/instructor/courses").await
    }

    pub async fn instructor_course_lessons(&self, course_id: DbId) -> Result<Vec<Lesson>, ApiError> {
        self.get(&format!("/instructor/courses/{course_id}/lessons"))
            .await
    }

    // ---- assessments ----

    pub async fn list_assessment_templates(
        &self,
        course_id: Option<DbId>,
    ) -> Result<Vec<AssessmentTemplate>, ApiError> {
        match course_id {
            Some(id) => {
                self.get_with_query("/instructor/assessments/templates", &[("course_id", id)])
                    .await
            }
            None => self.get("/instructor/assessments/templates").await,
        }
    }

    pub async fn create_assessment_template(
        &self,
        form: TemplateForm,
    ) -> Result<AssessmentTemplate, ApiError> {
        let form = form.validated()?;
        self.post("/instructor/assessments/templates", &form).await
    }

    pub async fn start_assessment_run(&self, template_id: DbId) -> Result<AssessmentRun, ApiError> {
        self.post_empty(&format!(
            "/instructor/assessments/templates/{template_id}/runs"
        ))
        .await
    }

    pub async fn assessment_run(&self, run_id: DbId) -> Result<AssessmentRun, ApiError> {
        self.get(&format!("/instructor/assessments/runs/{run_id}"))
            .await
    }

    // ---- invitations ----

    pub async fn list_invitations(&self, course_id: DbId) -> Result<Vec<Invitation>, ApiError> {
        self.get(&format!("/instructor/courses/{course_id}/invitations"))
            .await
    }

    /// Send a batch of invitations. The backend answers with a structured
    /// partial result rather than failing the whole batch.
    pub async fn send_invitations(
        &self,
        course_id: DbId,
        batch: &InvitationBatch,
    ) -> Result<InvitationBatchResult, ApiError> {
        self.post(&format!("/instructor/courses/{course_id}/invitations"), batch)
            .await
    }

    // ---- join links ----

    pub async fn list_join_links(&self, course_id: DbId) -> Result<Vec<JoinLink>, ApiError> {
        self.get(&format!("/instructor/courses/{course_id}/join-links"))
            .await
    }

    pub async fn create_join_link(
        &self,
        course_id: DbId,
        request: &CreateJoinLinkRequest,
    ) -> Result<JoinLink, ApiError> {
        self.post(&format!("/instructor/courses/{course_id}/join-links"), request)
            .await
    }

    pub async fn revoke_join_link(&self, link_id: DbId) -> Result<(), ApiError> {
        self.delete(&format!("/instructor/join-links/{link_id}"))
            .await
    }

    // ---- transcriptions ----

    pub async fn list_transcriptions(&self) -> Result<Vec<Transcription>, ApiError> {
        self.get("/instructor/transcriptions").await
    }
}
