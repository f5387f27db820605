//! Cache change events.
//!
//! Every change to a cache entry is announced on a `tokio::sync::broadcast`
//! channel owned by [`QueryClient`](crate::QueryClient). Observers react
//! to these events; they never poke at each other directly.

use crate::key::QueryKey;

/// Default buffer capacity for the cache event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A fetch for this exact key started.
    Fetching(QueryKey),
    /// New data was stored under this exact key.
    Updated(QueryKey),
    /// The latest fetch for this exact key failed; prior data is kept.
    Failed(QueryKey),
    /// Every key starting with this prefix is stale and should refetch.
    Invalidated(QueryKey),
    /// Every key starting with this prefix was dropped from the cache.
    Removed(QueryKey),
}

impl CacheEvent {
    /// True if an observer of `key` should react to this event.
    pub fn concerns(&self, key: &QueryKey) -> bool {
        match self {
            Self::Fetching(k) | Self::Updated(k) | Self::Failed(k) => k == key,
            Self::Invalidated(prefix) | Self::Removed(prefix) => key.starts_with(prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_events_concern_nested_keys() {
        let lessons = QueryKey::new("courses").with(3).with("lessons");
        assert!(CacheEvent::Invalidated(QueryKey::new("courses")).concerns(&lessons));
        assert!(CacheEvent::Removed(QueryKey::new("courses")).concerns(&lessons));
        assert!(!CacheEvent::Updated(QueryKey::new("courses")).concerns(&lessons));
        assert!(!CacheEvent::Invalidated(QueryKey::new("plans")).concerns(&lessons));
    }
}
