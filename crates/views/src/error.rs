use std::time::Duration;

use learnhub_client::{ApiError, ConfigError, StoreError};
use learnhub_core::error::CoreError;
use learnhub_core::practice::JoinFailure;

/// Errors surfaced by page controllers.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Form input was rejected locally; no request was sent.
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Api(ApiError),

    #[error("{}", .0.message())]
    Join(JoinFailure),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ViewError {
    /// One line suitable for a toast or an inline form error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::Timeout(_) => "The request took too long. Please try again.".to_string(),
            Self::Store(_) => "Could not save local data.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<CoreError> for ViewError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Invalid(msg),
            other => Self::Invalid(other.to_string()),
        }
    }
}

impl From<ApiError> for ViewError {
    /// Client-side validation failures reported by the accessor become
    /// [`ViewError::Invalid`].
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(core) => core.into(),
            other => Self::Api(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accessor_validation_becomes_invalid() {
        let err: ViewError = ApiError::Validation(CoreError::Validation("Video file is empty".into())).into();
        assert_matches!(err, ViewError::Invalid(msg) if msg == "Video file is empty");
    }

    #[test]
    fn join_failure_displays_fixed_message() {
        assert_eq!(
            ViewError::Join(JoinFailure::Expired).user_message(),
            "This practice link has expired."
        );
    }
}
