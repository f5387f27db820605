//! `/collaboration/sessions/*`.

use learnhub_core::collaboration::{
    is_valid_session_id, CodeUpdate, CollaborationSession, CreateSessionRequest,
};

use crate::api::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn collaboration_session(&self, id: &str) -> Result<CollaborationSession, ApiError> {
        ensure_session_id(id)?;
        self.get(&format!("/collaboration/sessions/{id}")).await
    }

    pub async fn create_collaboration_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CollaborationSession, ApiError> {
        self.post("/collaboration/sessions", request).await
    }

    pub async fn join_collaboration_session(
        &self,
        id: &str,
    ) -> Result<CollaborationSession, ApiError> {
        ensure_session_id(id)?;
        self.post_empty(&format!("/collaboration/sessions/{id}/join"))
            .await
    }

    pub async fn leave_collaboration_session(&self, id: &str) -> Result<(), ApiError> {
        ensure_session_id(id)?;
        self.post_empty(&format!("/collaboration/sessions/{id}/leave"))
            .await
    }

    /// Write new code. A `409` means `base_version` was stale.
    pub async fn update_session_code(
        &self,
        id: &str,
        update: &CodeUpdate,
    ) -> Result<CollaborationSession, ApiError> {
        ensure_session_id(id)?;
        self.put(&format!("/collaboration/sessions/{id}/code"), update)
            .await
    }
}

/// Ids that would escape their path segment never reach the URL.
fn ensure_session_id(id: &str) -> Result<(), ApiError> {
    if is_valid_session_id(id) {
        Ok(())
    } else {
        Err(ApiError::InvalidRequest(format!("Malformed session id '{id}'")))
    }
}
