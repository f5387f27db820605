//! AI assistants: lesson tutor chat, code review, study guides.
//!
//! These are plain writes without cached reads. The tutor keeps the
//! conversation so follow-up questions carry context.

use learnhub_core::llm::{
    ChatRole, ChatTurn, CodeReview, CodeReviewRequest, StudyGuide, StudyGuideRequest, TutorReply,
    TutorRequest,
};
use learnhub_core::types::DbId;
use tokio::sync::Mutex;

use crate::context::AppContext;
use crate::error::ViewError;

pub struct AssistantPage {
    ctx: AppContext,
    lesson_id: Option<DbId>,
    history: Mutex<Vec<ChatTurn>>,
}

impl AssistantPage {
    pub fn new(ctx: &AppContext, lesson_id: Option<DbId>) -> Self {
        Self {
            ctx: ctx.clone(),
            lesson_id,
            history: Mutex::new(Vec::new()),
        }
    }

    pub async fn history(&self) -> Vec<ChatTurn> {
        self.history.lock().await.clone()
    }

    /// Ask the tutor. The exchange is appended to the history only when
    /// the backend answers.
    pub async fn ask(&self, question: &str) -> Result<TutorReply, ViewError> {
        let mut history = self.history.lock().await;
        let request = TutorRequest::new(self.lesson_id, question, history.clone())?;
        let question = request.question.clone();

        let reply = self
            .ctx
            .mutation(|api, request: TutorRequest| async move { api.ask_tutor(&request).await })
            .error_context("The tutor could not answer")
            .mutate(request)
            .await?;

        history.push(ChatTurn {
            role: ChatRole::User,
            content: question,
        });
        history.push(ChatTurn {
            role: ChatRole::Assistant,
            content: reply.answer.clone(),
        });
        Ok(reply)
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    pub async fn review_code(&self, language: &str, code: &str) -> Result<CodeReview, ViewError> {
        let request = CodeReviewRequest::new(language, code)?;
        let review = self
            .ctx
            .mutation(|api, request: CodeReviewRequest| async move {
                api.review_code(&request).await
            })
            .error_context("Code review failed")
            .mutate(request)
            .await?;
        Ok(review)
    }

    pub async fn study_guide(
        &self,
        course_id: DbId,
        lesson_ids: Vec<DbId>,
    ) -> Result<StudyGuide, ViewError> {
        let guide = self
            .ctx
            .mutation(|api, request: StudyGuideRequest| async move {
                api.study_guide(&request).await
            })
            .success_message("Study guide ready")
            .error_context("Failed to generate study guide")
            .mutate(StudyGuideRequest {
                course_id,
                lesson_ids,
            })
            .await?;
        Ok(guide)
    }
}
