//! Presentation state shared by every list and detail page.

use std::sync::Arc;

use crate::state::QueryState;

/// What a page should render for one query.
#[derive(Debug)]
pub enum ViewState<T> {
    /// The query is disabled or has not started.
    Idle,
    Loading,
    /// The fetch failed and there is nothing cached to show.
    Failed(String),
    /// The fetch succeeded with an empty collection.
    Empty,
    Populated(Arc<T>),
}

impl<T> Clone for ViewState<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Failed(message) => Self::Failed(message.clone()),
            Self::Empty => Self::Empty,
            Self::Populated(data) => Self::Populated(Arc::clone(data)),
        }
    }
}

/// Values that can be "empty" from the user's point of view.
pub trait Listing {
    fn is_empty_listing(&self) -> bool;
}

impl<T> Listing for Vec<T> {
    fn is_empty_listing(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Listing for Option<T> {
    fn is_empty_listing(&self) -> bool {
        self.is_none()
    }
}

impl<T: Listing> ViewState<T> {
    /// Cached data wins over a later error, so a failed background
    /// refetch keeps showing the last good list.
    pub fn from_state(state: &QueryState<T>) -> Self {
        match (&state.data, &state.error) {
            (Some(data), _) if data.is_empty_listing() => Self::Empty,
            (Some(data), _) => Self::Populated(Arc::clone(data)),
            (None, Some(err)) => Self::Failed(err.user_message()),
            (None, None) if state.is_loading || state.is_fetching => Self::Loading,
            (None, None) => Self::Idle,
        }
    }
}

impl<T> ViewState<T> {
    /// For single resources, which are never "empty".
    pub fn from_single(state: &QueryState<T>) -> Self {
        match (&state.data, &state.error) {
            (Some(data), _) => Self::Populated(Arc::clone(data)),
            (None, Some(err)) => Self::Failed(err.user_message()),
            (None, None) if state.is_fetching => Self::Loading,
            (None, None) => Self::Idle,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Populated(data) => Some(data.as_ref()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use learnhub_client::ApiError;

    fn state<T>(data: Option<T>, fetching: bool, error: Option<ApiError>) -> QueryState<T> {
        let data = data.map(Arc::new);
        QueryState {
            is_loading: fetching && data.is_none(),
            data,
            is_fetching: fetching,
            error,
            ..QueryState::idle()
        }
    }

    #[test]
    fn list_states() {
        assert_matches!(ViewState::<Vec<i32>>::from_state(&state(None, false, None)), ViewState::Idle);
        assert_matches!(ViewState::<Vec<i32>>::from_state(&state(None, true, None)), ViewState::Loading);
        assert_matches!(ViewState::from_state(&state(Some(Vec::<i32>::new()), false, None)), ViewState::Empty);
        assert_matches!(
            ViewState::from_state(&state(Some(vec![1]), false, None)),
            ViewState::Populated(v) if *v == vec![1]
        );
    }

    #[test]
    fn error_without_data_is_failed_with_user_message() {
        let err = ApiError::Network("connection refused".into());
        assert_matches!(
            ViewState::<Vec<i32>>::from_state(&state(None, false, Some(err))),
            ViewState::Failed(msg) if msg == "Network error. Check your connection and try again."
        );
    }

    #[test]
    fn stale_data_survives_refetch_error() {
        let err = ApiError::Network("down".into());
        assert_matches!(
            ViewState::from_state(&state(Some(vec![7]), false, Some(err))),
            ViewState::Populated(_)
        );
    }

    #[test]
    fn single_resource_is_never_empty() {
        assert_matches!(ViewState::from_single(&state(Some(0_u8), false, None)), ViewState::Populated(_));
    }
}
