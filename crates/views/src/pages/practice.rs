//! Guest practice join flow.
//!
//! Loads the practice link, shows its metadata, and joins with a display
//! name. A successful join stores the guest session locally and
//! navigates to the session page.

use std::sync::Arc;

use learnhub_client::{ApiError, GuestSession};
use learnhub_core::practice::{JoinFailure, JoinPracticeRequest, PracticeLinkInfo};
use learnhub_query::{Query, QueryState};

use crate::context::AppContext;
use crate::error::ViewError;
use crate::keys;
use crate::route::Route;

/// What the join page renders.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinPageView {
    Loading,
    Ready(Arc<PracticeLinkInfo>),
    /// The link cannot be joined; render [`JoinFailure::message`].
    Unavailable(JoinFailure),
}

impl JoinPageView {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Unavailable(failure) => Some(failure.message()),
            _ => None,
        }
    }
}

pub struct PracticeJoinPage {
    ctx: AppContext,
    code: String,
    link: Query<PracticeLinkInfo>,
}

impl PracticeJoinPage {
    pub fn new(ctx: &AppContext, code: &str) -> Self {
        let code = code.trim().to_string();
        let fetch_code = code.clone();
        let link = ctx.query(keys::practice_link(&code), move |api| {
            let code = fetch_code.clone();
            async move { api.practice_link(&code).await }
        });

        Self {
            ctx: ctx.clone(),
            code,
            link,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn link(&self) -> &Query<PracticeLinkInfo> {
        &self.link
    }

    pub fn view_of(state: &QueryState<PracticeLinkInfo>) -> JoinPageView {
        match (&state.data, &state.error) {
            (Some(info), _) => JoinPageView::Ready(Arc::clone(info)),
            (None, Some(e)) => JoinPageView::Unavailable(classify(e)),
            (None, None) => JoinPageView::Loading,
        }
    }

    pub async fn load(&self) -> JoinPageView {
        Self::view_of(&self.link.fetch().await)
    }

    /// A guest session saved by an earlier join, to continue instead of
    /// joining again.
    pub async fn resume(&self) -> Option<Route> {
        let session = self.ctx.store.guest_session().await?;
        tracing::debug!(session_id = %session.session_id, "Resuming guest practice session");
        Some(Route::PracticeSession {
            session_id: session.session_id,
        })
    }

    /// Display name last used on this device, to prefill the form.
    pub async fn remembered_name(&self) -> Option<String> {
        self.ctx
            .store
            .get(learnhub_client::store::keys::DISPLAY_NAME)
            .await
    }

    /// Join the practice session as `display_name`.
    ///
    /// A blank name is rejected without a request. The whole join must
    /// finish within the configured join timeout.
    pub async fn join(&self, display_name: &str) -> Result<Route, ViewError> {
        let request = JoinPracticeRequest::from_input(display_name)?;
        let timeout = self.ctx.config.join_timeout;

        let outcome = tokio::time::timeout(
            timeout,
            self.ctx.api.join_practice_link(&self.code, &request),
        )
        .await;

        let joined = match outcome {
            Ok(Ok(joined)) => joined,
            Ok(Err(e)) => {
                let failure = classify(&e);
                tracing::warn!(code = %self.code, error = %e, ?failure, "Practice join failed");
                self.ctx.notifications.error(failure.message());
                return Err(ViewError::Join(failure));
            }
            Err(_) => {
                tracing::warn!(
                    code = %self.code,
                    timeout_ms = timeout.as_millis() as u64,
                    "Practice join timed out",
                );
                self.ctx
                    .notifications
                    .error(JoinFailure::Unavailable.message());
                return Err(ViewError::Timeout(timeout));
            }
        };

        self.ctx
            .store
            .save_guest_session(&GuestSession {
                session_id: joined.session_id.clone(),
                session_token: joined.session_token,
                display_name: Some(request.name),
            })
            .await?;

        tracing::info!(code = %self.code, session_id = %joined.session_id, "Joined practice session");
        Ok(Route::PracticeSession {
            session_id: joined.session_id,
        })
    }

    /// Leave the guest session on this device.
    pub async fn forget_session(&self) -> Result<(), ViewError> {
        self.ctx.store.clear_guest_session().await?;
        Ok(())
    }
}

fn classify(err: &ApiError) -> JoinFailure {
    JoinFailure::classify(err.status(), err.code())
}
