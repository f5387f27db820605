//! `/llm/*`: AI tutor, code review and study guide generation.

use learnhub_core::llm::{
    CodeReview, CodeReviewRequest, StudyGuide, StudyGuideRequest, TutorReply, TutorRequest,
};

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn ask_tutor(&self, request: &TutorRequest) -> Result<TutorReply, ApiError> {
        self.post("/llm/tutor", request).await
    }

    pub async fn review_code(&self, request: &CodeReviewRequest) -> Result<CodeReview, ApiError> {
        self.post("/llm/code-review", request).await
    }

    pub async fn study_guide(&self, request: &StudyGuideRequest) -> Result<StudyGuide, ApiError> {
        self.post("/llm/study-guide", request).await
    }
}
