//! Instructor workspace: courses, assessments, invitations, join links
//! and transcriptions.

use learnhub_core::assessment::{AssessmentRun, AssessmentTemplate, TemplateForm};
use learnhub_core::course::{Course, Lesson};
use learnhub_core::instructor::{
    CreateJoinLinkRequest, Invitation, InvitationBatch, InvitationBatchResult, JoinLink,
    Transcription,
};
use learnhub_core::polling::{ASSESSMENT_RUN_POLL_INTERVAL, TRANSCRIPTION_POLL_INTERVAL};
use learnhub_core::types::DbId;
use learnhub_query::reconcile::KeepOptimistic;
use learnhub_query::{Query, QueryObserver, ViewState};

use crate::context::AppContext;
use crate::error::ViewError;
use crate::keys;

pub struct InstructorPage {
    ctx: AppContext,
    courses: Query<Vec<Course>>,
}

impl InstructorPage {
    pub fn new(ctx: &AppContext) -> Self {
        let courses = ctx.query(keys::instructor_courses(), |api| async move {
            api.instructor_courses().await
        });
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

    pub fn lessons(&self, course_id: DbId) -> Query<Vec<Lesson>> {
        self.ctx
            .query(keys::instructor_lessons(course_id), move |api| async move {
                api.instructor_course_lessons(course_id).await
            })
    }

    // ---- assessments ----

    pub fn templates(&self, course_id: Option<DbId>) -> Query<Vec<AssessmentTemplate>> {
        self.ctx
            .query(keys::assessment_templates_for(course_id), move |api| async move {
                api.list_assessment_templates(course_id).await
            })
    }

    pub async fn create_template(&self, form: TemplateForm) -> Result<AssessmentTemplate, ViewError> {
        let form = form.validated()?;
        let template = self
            .ctx
            .mutation(|api, form: TemplateForm| async move {
                api.create_assessment_template(form).await
            })
            .invalidates(keys::assessment_templates())
            .success_message("Assessment created")
            .error_context("Failed to create assessment")
            .mutate(form)
            .await?;
        Ok(template)
    }

    pub async fn start_run(&self, template_id: DbId) -> Result<AssessmentRun, ViewError> {
        let run = self
            .ctx
            .mutation(|api, id: DbId| async move { api.start_assessment_run(id).await })
            .success_message("Assessment run started")
            .error_context("Failed to start assessment run")
            .mutate(template_id)
            .await?;
        self.ctx
            .queries
            .set_data(&keys::assessment_run(run.id), run.clone());
        Ok(run)
    }

    /// Run status, polled while observed.
    pub fn run(&self, run_id: DbId) -> Query<AssessmentRun> {
        self.ctx
            .query(keys::assessment_run(run_id), move |api| async move {
                api.assessment_run(run_id).await
            })
            .refetch_interval(ASSESSMENT_RUN_POLL_INTERVAL)
    }

    /// Poll the run until it completes or fails. Polling stops on return.
    pub async fn wait_for_run(&self, run_id: DbId) -> Result<AssessmentRun, ViewError> {
        let mut observer: QueryObserver<AssessmentRun> = self.ctx.observe(&self.run(run_id));
        let state = observer
            .wait_for(|s| {
                s.data.as_ref().is_some_and(|run| run.status.is_terminal())
                    || (s.data.is_none() && s.error.is_some())
            })
            .await;

        let Some(state) = state else {
            return Err(ViewError::Invalid("Stopped watching the run".into()));
        };
        match (state.data, state.error) {
            (Some(run), _) => Ok((*run).clone()),
            (None, Some(e)) => Err(e.into()),
            (None, None) => Err(ViewError::Invalid("Run status unavailable".into())),
        }
    }

    // ---- invitations ----

    pub fn invitations(&self, course_id: DbId) -> Query<Vec<Invitation>> {
        self.ctx
            .query(keys::invitations(course_id), move |api| async move {
                api.list_invitations(course_id).await
            })
    }

    /// Invite the addresses found in `raw` (separated by commas, semicolons
    /// or whitespace).
    ///
    /// The partial result is summarized in one notification, e.g.
    /// "3 invitations sent, 2 already enrolled".
    pub async fn send_invitations(
        &self,
        course_id: DbId,
        raw: &str,
    ) -> Result<InvitationBatchResult, ViewError> {
        let batch = InvitationBatch::parse(raw)?;
        let result = self
            .ctx
            .mutation(move |api, batch: InvitationBatch| async move {
                api.send_invitations(course_id, &batch).await
            })
            .invalidates(keys::invitations(course_id))
            .error_context("Failed to send invitations")
            .mutate(batch)
            .await?;

        let summary = result.summary();
        if result.is_total_failure() {
            self.ctx.notifications.error(summary);
        } else {
            self.ctx.notifications.success(summary);
        }
        Ok(result)
    }

    // ---- join links ----

    pub fn join_links(&self, course_id: DbId) -> Query<Vec<JoinLink>> {
        self.ctx
            .query(keys::join_links(course_id), move |api| async move {
                api.list_join_links(course_id).await
            })
    }

    pub async fn create_join_link(
        &self,
        course_id: DbId,
        request: CreateJoinLinkRequest,
    ) -> Result<JoinLink, ViewError> {
        let link = self
            .ctx
            .mutation(move |api, request: CreateJoinLinkRequest| async move {
                api.create_join_link(course_id, &request).await
            })
            .invalidates(keys::join_links(course_id))
            .success_message("Join link created")
            .error_context("Failed to create join link")
            .mutate(request)
            .await?;
        Ok(link)
    }

    pub async fn revoke_join_link(&self, course_id: DbId, link_id: DbId) -> Result<(), ViewError> {
        self.ctx
            .mutation(|api, id: DbId| async move { api.revoke_join_link(id).await })
            .invalidates(keys::join_links(course_id))
            .success_message("Join link revoked")
            .error_context("Failed to revoke join link")
            .mutate_optimistic(
                link_id,
                &keys::join_links(course_id),
                |links: &Vec<JoinLink>| links.iter().filter(|l| l.id != link_id).cloned().collect(),
                KeepOptimistic,
            )
            .await?;
        Ok(())
    }

    // ---- transcriptions ----

    pub fn transcriptions(&self) -> Query<Vec<Transcription>> {
        self.ctx
            .query(keys::transcriptions(), |api| async move {
                api.list_transcriptions().await
            })
            .refetch_interval(TRANSCRIPTION_POLL_INTERVAL)
    }
}
