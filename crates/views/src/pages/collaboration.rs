//! Live collaboration session view.
//!
//! The session is polled every few seconds so participants and code stay
//! current. Code edits carry the version they were based on; a stale
//! edit is rejected by the backend with `409` and the view refetches.

use learnhub_core::collaboration::{CodeUpdate, CollaborationSession, CreateSessionRequest};
use learnhub_core::polling::COLLABORATION_POLL_INTERVAL;
use learnhub_core::validation::require_non_blank;
use learnhub_query::{Query, QueryObserver, ViewState};

use crate::context::AppContext;
use crate::error::ViewError;
use crate::keys;
use crate::route::Route;

pub struct CollaborationPage {
    ctx: AppContext,
    session_id: String,
    session: Query<CollaborationSession>,
}

impl CollaborationPage {
    pub fn new(ctx: &AppContext, session_id: &str) -> Self {
        let session_id = session_id.to_string();
        let fetch_id = session_id.clone();
        let session = ctx
            .query(keys::collaboration_session(&session_id), move |api| {
                let id = fetch_id.clone();
                async move { api.collaboration_session(&id).await }
            })
            .refetch_interval(COLLABORATION_POLL_INTERVAL);

        Self {
            ctx: ctx.clone(),
            session_id,
            session,
        }
    }

    /// Create a session and return the route to open it.
    pub async fn create(ctx: &AppContext, title: &str, language: Option<&str>) -> Result<Route, ViewError> {
        let request = CreateSessionRequest {
            title: require_non_blank(title, "Session title")?,
            language: language.map(str::trim).filter(|l| !l.is_empty()).map(String::from),
        };

        let session = ctx
            .mutation(|api, request: CreateSessionRequest| async move {
                api.create_collaboration_session(&request).await
            })
            .success_message("Session created")
            .error_context("Failed to create session")
            .mutate(request)
            .await?;

        ctx.queries
            .set_data(&keys::collaboration_session(&session.id), session.clone());
        Ok(Route::CollaborationSession {
            session_id: session.id,
        })
    }

    pub fn session(&self) -> &Query<CollaborationSession> {
        &self.session
    }

    pub async fn load(&self) -> ViewState<CollaborationSession> {
        ViewState::from_single(&self.session.fetch().await)
    }

    /// Keep the session fresh while the page is open.
    pub fn observe(&self) -> QueryObserver<CollaborationSession> {
        self.ctx.observe(&self.session)
    }

    pub async fn join(&self) -> Result<CollaborationSession, ViewError> {
        let session = self
            .ctx
            .mutation(|api, id: String| async move { api.join_collaboration_session(&id).await })
            .error_context("Failed to join session")
            .mutate(self.session_id.clone())
            .await?;
        self.ctx
            .queries
            .set_data(&keys::collaboration_session(&self.session_id), session.clone());
        Ok(session)
    }

    pub async fn leave(&self) -> Result<(), ViewError> {
        self.ctx
            .mutation(|api, id: String| async move { api.leave_collaboration_session(&id).await })
            .invalidates(keys::collaboration_session(&self.session_id))
            .success_message("You left the session")
            .error_context("Failed to leave session")
            .mutate(self.session_id.clone())
            .await?;
        Ok(())
    }

    /// Replace the session code, based on the version currently shown.
    pub async fn push_code(&self, code: &str) -> Result<CollaborationSession, ViewError> {
        let base_version = match self.session.state().data {
            Some(session) => session.version,
            None => self.session.data().await?.version,
        };
        let update = CodeUpdate {
            code: code.to_string(),
            base_version,
        };

        let result = self
            .ctx
            .mutation(|api, (id, update): (String, CodeUpdate)| async move {
                api.update_session_code(&id, &update).await
            })
            .error_context("Failed to save code")
            .mutate((self.session_id.clone(), update))
            .await;

        let key = keys::collaboration_session(&self.session_id);
        match result {
            Ok(session) => {
                self.ctx.queries.set_data(&key, session.clone());
                Ok(session)
            }
            Err(e) => {
                if e.status() == Some(409) {
                    tracing::info!(session_id = %self.session_id, base_version, "Code edit was stale, refetching");
                    self.ctx.queries.invalidate(&key);
                }
                Err(e.into())
            }
        }
    }
}
