use std::fmt;
use std::sync::Arc;

use learnhub_client::ApiError;
use tokio::time::Instant;

/// Snapshot of one cache entry as seen by a typed query.
pub struct QueryState<T> {
    /// Last successfully fetched (or locally set) value.
    pub data: Option<Arc<T>>,
    /// A fetch is running and there is no data to show yet.
    pub is_loading: bool,
    /// A fetch is running, with or without data.
    pub is_fetching: bool,
    /// Error of the most recent fetch, if it failed after the data was set.
    pub error: Option<ApiError>,
    /// When `data` was stored.
    pub updated_at: Option<Instant>,
    pub(crate) revision: u64,
}

impl<T> QueryState<T> {
    /// State of a key that was never fetched, or of a disabled query.
    pub fn idle() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_fetching: false,
            error: None,
            updated_at: None,
            revision: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.data.is_none() && !self.is_fetching && self.error.is_none()
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }

    /// True if publishing `other` after `self` would tell a reader nothing new.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        self.revision == other.revision
            && self.is_fetching == other.is_fetching
            && self.data.is_some() == other.data.is_some()
            && self.error == other.error
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            is_fetching: self.is_fetching,
            error: self.error.clone(),
            updated_at: self.updated_at,
            revision: self.revision,
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T: fmt::Debug> fmt::Debug for QueryState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryState")
            .field("data", &self.data)
            .field("is_loading", &self.is_loading)
            .field("is_fetching", &self.is_fetching)
            .field("error", &self.error)
            .field("revision", &self.revision)
            .finish()
    }
}
